use podwatch::{PinGuard, PodcastDraft};
use podwatch_client::{HttpApi, RequestStateStore};
use podwatch_server::api::{router, AppState};
use podwatch_server::storage::PodcastStore;

pub const ADMIN_PIN: &str = "9999";

/// A real server on an ephemeral port, backed by an in-memory sled store,
/// with the admin PIN configured.
pub struct TestServer {
    pub base_url: String,
}

pub async fn spawn_server() -> TestServer {
    let store = PodcastStore::temporary().expect("temporary store");
    let state = AppState { store, guard: PinGuard::new(Some(ADMIN_PIN.to_string())) };
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    TestServer { base_url: format!("http://{addr}") }
}

impl TestServer {
    /// Client store wired to this server over real HTTP.
    pub fn store(&self) -> RequestStateStore<HttpApi> {
        let api = HttpApi::new(&self.base_url).expect("http api");
        RequestStateStore::new(api)
    }

    pub fn podcasts_url(&self) -> String {
        format!("{}/api/v1/podcasts", self.base_url)
    }
}

/// A complete, valid creation payload with the given title and PIN.
pub fn draft(title: &str, category: &str, pin: &str) -> PodcastDraft {
    PodcastDraft {
        title: Some(title.to_string()),
        host: Some("Ira Flatow".to_string()),
        url: Some("https://open.spotify.com/show/x".to_string()),
        category: Some(category.to_string()),
        rating: Some(4.5),
        description: Some(format!("{title}, every week")),
        pin: Some(pin.to_string()),
    }
}
