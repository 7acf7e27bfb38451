use std::time::Duration;

use podwatch::{Podcast, PodcastDraft, PodcastError, PodcastPatch};
use serde::{Deserialize, Serialize};

/// Transport seam between the state store and the server. The store only
/// ever sees the taxonomy in [`PodcastError`]; implementations translate
/// whatever their transport produces.
pub trait PodcastApi {
    fn fetch_all(&self) -> impl std::future::Future<Output = Result<Vec<Podcast>, PodcastError>>;
    fn fetch_one(&self, id: &str) -> impl std::future::Future<Output = Result<Podcast, PodcastError>>;
    fn create(&self, draft: &PodcastDraft) -> impl std::future::Future<Output = Result<Podcast, PodcastError>>;
    fn update(
        &self,
        id: &str,
        patch: &PodcastPatch,
        pin: &str,
    ) -> impl std::future::Future<Output = Result<Podcast, PodcastError>>;
    fn delete(&self, id: &str, pin: &str) -> impl std::future::Future<Output = Result<(), PodcastError>>;
    fn search(&self, term: &str) -> impl std::future::Future<Output = Result<Vec<Podcast>, PodcastError>>;
}

#[derive(Deserialize)]
struct ListEnvelope {
    data: ListData,
}

#[derive(Deserialize)]
struct ListData {
    podcasts: Vec<Podcast>,
}

#[derive(Deserialize)]
struct OneEnvelope {
    data: OneData,
}

#[derive(Deserialize)]
struct OneData {
    podcast: Podcast,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    #[serde(flatten)]
    patch: &'a PodcastPatch,
    pin: &'a str,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    pin: &'a str,
}

/// reqwest-backed implementation speaking the `/api/v1/podcasts` contract.
#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

fn transport(err: reqwest::Error) -> PodcastError {
    PodcastError::Transport(err.to_string())
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PodcastError> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build().map_err(transport)?;
        Ok(HttpApi { base_url: base_url.into().trim_end_matches('/').to_string(), client })
    }

    fn root(&self) -> String {
        format!("{}/api/v1/podcasts", self.base_url)
    }

    /// Map a non-success response onto the shared taxonomy using the
    /// uniform `{status, message}` payload.
    async fn error_from(response: reqwest::Response) -> PodcastError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorEnvelope>()
            .await
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        match status {
            400 => PodcastError::Validation(message),
            403 => PodcastError::InvalidPin,
            404 => PodcastError::NotFound,
            409 => PodcastError::Conflict(message),
            _ => PodcastError::Internal(message),
        }
    }

    async fn expect_list(response: reqwest::Response) -> Result<Vec<Podcast>, PodcastError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let envelope: ListEnvelope = response.json().await.map_err(transport)?;
        Ok(envelope.data.podcasts)
    }

    async fn expect_one(response: reqwest::Response) -> Result<Podcast, PodcastError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let envelope: OneEnvelope = response.json().await.map_err(transport)?;
        Ok(envelope.data.podcast)
    }
}

impl PodcastApi for HttpApi {
    async fn fetch_all(&self) -> Result<Vec<Podcast>, PodcastError> {
        let response = self.client.get(self.root()).send().await.map_err(transport)?;
        Self::expect_list(response).await
    }

    async fn fetch_one(&self, id: &str) -> Result<Podcast, PodcastError> {
        let response = self.client.get(format!("{}/{id}", self.root())).send().await.map_err(transport)?;
        Self::expect_one(response).await
    }

    async fn create(&self, draft: &PodcastDraft) -> Result<Podcast, PodcastError> {
        let response = self.client.post(self.root()).json(draft).send().await.map_err(transport)?;
        Self::expect_one(response).await
    }

    async fn update(&self, id: &str, patch: &PodcastPatch, pin: &str) -> Result<Podcast, PodcastError> {
        let body = UpdateBody { patch, pin };
        let response = self.client.patch(format!("{}/{id}", self.root())).json(&body).send().await.map_err(transport)?;
        Self::expect_one(response).await
    }

    async fn delete(&self, id: &str, pin: &str) -> Result<(), PodcastError> {
        let body = DeleteBody { pin };
        let response = self.client.delete(format!("{}/{id}", self.root())).json(&body).send().await.map_err(transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn search(&self, term: &str) -> Result<Vec<Podcast>, PodcastError> {
        let response =
            self.client.get(self.root()).query(&[("search", term)]).send().await.map_err(transport)?;
        Self::expect_list(response).await
    }
}
