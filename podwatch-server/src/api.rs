use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use podwatch::{unix_now, validate, PinGuard, Podcast, PodcastDraft, PodcastError, PodcastPatch, StoredPodcast};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::query::ListQuery;
use crate::storage::{self, PodcastStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: PodcastStore,
    pub guard: PinGuard,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/podcasts", get(list_podcasts).post(create_podcast))
        .route("/api/v1/podcasts/stats", get(podcast_stats))
        .route("/api/v1/podcasts/top-rated", get(top_rated))
        .route("/api/v1/podcasts/{id}", get(get_podcast).patch(update_podcast).delete(delete_podcast))
        .with_state(state)
}

pub async fn serve(bind: &str, state: AppState, cors: CorsLayer) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state).layer(cors);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("shutting down");
    };
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Boundary error: every failure leaving a handler becomes the uniform
/// `{status, message}` payload, 4xx as "fail" and 5xx as "error".
struct ApiError(PodcastError);

impl From<PodcastError> for ApiError {
    fn from(err: PodcastError) -> Self {
        ApiError(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        log::error!("storage failure: {err}");
        ApiError(PodcastError::Internal("Internal server error".into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let status = if code.is_client_error() { "fail" } else { "error" };
        (code, Json(json!({ "status": status, "message": self.0.to_string() }))).into_response()
    }
}

async fn list_podcasts(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Value>, ApiError> {
    let podcasts: Vec<Podcast> = state.store.all()?.into_iter().map(|record| record.podcast).collect();
    let out = query.apply(podcasts);
    Ok(Json(json!({
        "status": "success",
        "results": out.len(),
        "data": { "podcasts": out },
    })))
}

async fn get_podcast(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let record = state.store.get(&id)?.ok_or(PodcastError::NotFound)?;
    Ok(Json(json!({ "status": "success", "data": { "podcast": record.podcast } })))
}

async fn create_podcast(
    State(state): State<AppState>,
    Json(draft): Json<PodcastDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate::check_draft(&draft)?;
    let pin_hash = state.guard.establish(draft.pin.as_deref())?;

    // draft fields were just validated; missing ones cannot reach here
    let podcast = Podcast {
        id: storage::new_id(),
        title: draft.title.as_deref().unwrap_or_default().trim().to_string(),
        host: draft.host.as_deref().unwrap_or_default().trim().to_string(),
        url: draft.url.clone().unwrap_or_default(),
        category: draft.category.as_deref().and_then(podwatch::Category::parse).unwrap_or(podwatch::Category::Other),
        rating: draft.rating.map(validate::normalize_rating),
        description: draft.description.as_deref().map(|d| d.trim().to_string()),
        created_at: unix_now(),
        updated_at: None,
    };
    state.store.put(&StoredPodcast { podcast: podcast.clone(), pin_hash })?;
    log::info!("created podcast {} ({})", podcast.id, podcast.title);

    Ok((StatusCode::CREATED, Json(json!({ "status": "success", "data": { "podcast": podcast } }))))
}

#[derive(Deserialize)]
struct UpdateRequest {
    #[serde(flatten)]
    patch: PodcastPatch,
    pin: Option<String>,
}

async fn update_podcast(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let stored = state.store.get(&id)?;
    // gate first: PIN format, then existence, then match
    state.guard.authorize(request.pin.as_deref(), stored.as_ref().map(|r| r.pin_hash.as_str()))?;
    let Some(mut record) = stored else {
        return Err(PodcastError::NotFound.into());
    };

    validate::check_patch(&request.patch)?;
    if request.patch.is_empty() {
        return Err(PodcastError::validation(validate::NO_FIELDS).into());
    }

    record.podcast.apply(&request.patch, unix_now());
    state.store.put(&record)?;
    log::info!("updated podcast {}", record.podcast.id);
    Ok(Json(json!({ "status": "success", "data": { "podcast": record.podcast } })))
}

#[derive(Deserialize)]
struct DeleteRequest {
    pin: Option<String>,
}

async fn delete_podcast(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> Result<StatusCode, ApiError> {
    let stored = state.store.get(&id)?;
    state.guard.authorize(request.pin.as_deref(), stored.as_ref().map(|r| r.pin_hash.as_str()))?;

    state.store.remove(&id)?;
    if let Some(record) = stored {
        log::info!("deleted podcast {} ({})", id, record.podcast.title);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryStats {
    category: &'static str,
    num_podcasts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_rating: Option<f64>,
}

async fn podcast_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let podcasts: Vec<Podcast> = state.store.all()?.into_iter().map(|record| record.podcast).collect();

    let mut stats: Vec<CategoryStats> = Vec::new();
    for category in podwatch::Category::ALL {
        let in_category: Vec<&Podcast> = podcasts.iter().filter(|p| p.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        let ratings: Vec<f64> = in_category.iter().filter_map(|p| p.rating).collect();
        let avg = if ratings.is_empty() { None } else { Some(ratings.iter().sum::<f64>() / ratings.len() as f64) };
        stats.push(CategoryStats {
            category: category.as_str(),
            num_podcasts: in_category.len(),
            avg_rating: avg,
            min_rating: ratings.iter().copied().fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.min(r)))),
            max_rating: ratings.iter().copied().fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.max(r)))),
        });
    }
    stats.sort_by(|a, b| b.avg_rating.partial_cmp(&a.avg_rating).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Json(json!({ "status": "success", "data": { "stats": stats } })))
}

async fn top_rated(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut podcasts: Vec<Podcast> = state.store.all()?.into_iter().map(|record| record.podcast).collect();
    podcasts.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
    podcasts.truncate(5);
    Ok(Json(json!({
        "status": "success",
        "results": podcasts.len(),
        "data": { "podcasts": podcasts },
    })))
}
