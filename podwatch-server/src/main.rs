use axum::http::HeaderValue;
use clap::Parser;
use podwatch::PinGuard;
use podwatch_server::api::{self, AppState};
use podwatch_server::storage::PodcastStore;
use tower_http::cors::{Any, CorsLayer};

#[derive(Parser, Debug)]
#[command(name = "podwatch-server", version, about = "Podcast watchlist REST API")]
struct Args {
    /// Address to bind the HTTP listener on
    #[arg(long, default_value = "127.0.0.1:3005")]
    bind: String,
    /// Path to the sled database directory
    #[arg(long, default_value = "podwatch.db")]
    db: String,
    /// Admin PIN that authorizes mutation of any podcast; falls back to the
    /// ADMIN_PIN environment variable
    #[arg(long)]
    admin_pin: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let admin_pin = args.admin_pin.or_else(|| std::env::var("ADMIN_PIN").ok());
    if admin_pin.is_none() {
        log::warn!("no admin PIN configured; per-podcast PINs only");
    }

    let store = match PodcastStore::open(&args.db) {
        Ok(store) => store,
        Err(err) => {
            log::error!("cannot open database at {}: {err}", args.db);
            std::process::exit(1);
        }
    };

    let state = AppState { store, guard: PinGuard::new(admin_pin) };
    log::info!("podwatch-server on http://{}/", args.bind);
    if let Err(err) = api::serve(&args.bind, state, build_cors_from_env()).await {
        log::error!("server error: {err}");
        std::process::exit(1);
    }
}

fn build_cors_from_env() -> CorsLayer {
    if let Ok(origins) = std::env::var("PODWATCH_CORS_ORIGINS") {
        let list = origins.split(',').filter_map(|s| HeaderValue::from_str(s.trim()).ok()).collect::<Vec<_>>();
        if !list.is_empty() {
            return CorsLayer::new().allow_origin(list).allow_methods(tower_http::cors::AllowMethods::any()).allow_headers(Any);
        }
    }
    CorsLayer::new().allow_origin(Any).allow_methods(tower_http::cors::AllowMethods::any()).allow_headers(Any)
}
