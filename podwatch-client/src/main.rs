use clap::{Parser, Subcommand};
use podwatch::{Category, PodcastDraft, PodcastPatch};
use podwatch_client::{HttpApi, RequestStateStore};

#[derive(Parser, Debug)]
#[command(name = "podwatch", version, about = "Podcast watchlist client")]
struct Args {
    /// Base URL of the podwatch API
    #[arg(long, default_value = "http://127.0.0.1:3005")]
    api_url: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List every podcast on the watchlist
    List,
    /// Show a single podcast
    Get { id: String },
    /// Add a podcast to the watchlist
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        host: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        /// 4-digit PIN that will guard this podcast's updates and deletion
        #[arg(long)]
        pin: String,
    },
    /// Edit fields on an existing podcast (PIN gated)
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        pin: String,
    },
    /// Delete a podcast (PIN gated)
    Remove {
        id: String,
        #[arg(long)]
        pin: String,
    },
    /// Search podcasts by title, host or description
    Search { term: String },
    /// Show only the given categories, evaluated locally
    Filter { categories: Vec<Category> },
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("serialize failed: {err}"),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let api = match HttpApi::new(&args.api_url) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let mut store = RequestStateStore::new(api);

    match args.command {
        Cmd::List => {
            store.fetch_all().await;
            print_json(&store.visible());
        }
        Cmd::Get { id } => {
            store.fetch_one(&id).await;
            if let Some(podcast) = store.focused() {
                print_json(podcast);
            }
        }
        Cmd::Add { title, host, url, category, rating, description, pin } => {
            let draft = PodcastDraft {
                title: Some(title),
                host: Some(host),
                url: Some(url),
                category: Some(category),
                rating,
                description,
                pin: Some(pin),
            };
            store.create(&draft).await;
            if let Some(created) = store.podcasts().last() {
                print_json(created);
            }
        }
        Cmd::Edit { id, title, host, url, category, rating, description, pin } => {
            let patch = PodcastPatch { title, host, url, category, rating, description };
            store.fetch_one(&id).await;
            store.update(&id, &patch, &pin).await;
            if let Some(podcast) = store.focused() {
                print_json(podcast);
            }
        }
        Cmd::Remove { id, pin } => {
            store.delete(&id, &pin).await;
        }
        Cmd::Search { term } => {
            store.search(&term).await;
            print_json(&store.visible());
        }
        Cmd::Filter { categories } => {
            store.fetch_all().await;
            store.filter(&categories);
            print_json(&store.visible());
        }
    }

    if let Some(message) = store.last_error() {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
