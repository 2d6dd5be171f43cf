use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use atlas_core::{
    config::AppConfig,
    query::{QueryError, QueryService},
    types::Health,
};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    query: Arc<QueryService>,
    /// Precomputed `Cache-Control` value for successful data responses.
    cache_control: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(query: Arc<QueryService>, config: &AppConfig) -> Self {
        let cache_control = format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            config.cache_control.ttl_seconds, config.cache_control.stale_while_revalidate_seconds,
        );
        Self { query, cache_control: Arc::from(cache_control) }
    }
}

/// Builds the API router.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/pnodes", get(list_pnodes))
        .route("/api/pnodes/{id}", get(get_pnode))
        .route("/api/pnodes/{id}/score", get(get_pnode_score))
        .route("/api/stats", get(get_stats))
        .with_state(state)
}

/// Query parameters accepted by the list operation.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Post-synthesis health filter.
    pub health: Option<Health>,
    /// Attach the overall composite score to each node.
    #[serde(default)]
    pub scores: bool,
}

/// Liveness probe. Answers without touching the upstream cluster.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_pnodes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    match state.query.list(params.health, params.scores).await {
        Ok(list) => cacheable_json(&state, &list),
        Err(e) => error_response(&e),
    }
}

async fn get_pnode(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.query.detail(&id).await {
        Ok(node) => cacheable_json(&state, &node),
        Err(e) => error_response(&e),
    }
}

async fn get_pnode_score(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.query.detail_score(&id).await {
        Ok(score) => cacheable_json(&state, &score),
        Err(e) => error_response(&e),
    }
}

async fn get_stats(State(state): State<AppState>) -> Response {
    match state.query.stats().await {
        Ok(stats) => cacheable_json(&state, &stats),
        Err(e) => error_response(&e),
    }
}

/// Wraps a successful payload with the short-TTL public cache policy.
fn cacheable_json<T: serde::Serialize>(state: &AppState, body: &T) -> Response {
    ([(header::CACHE_CONTROL, state.cache_control.to_string())], Json(body)).into_response()
}

/// Maps query failures to their externally visible conditions.
///
/// Upstream exhaustion is a 503 - the surface never fabricates partial or
/// stale data to mask a failed fetch. A missed lookup is a 404, distinct
/// from upstream failure.
fn error_response(error: &QueryError) -> Response {
    let status = match error {
        QueryError::NotFound(_) => StatusCode::NOT_FOUND,
        QueryError::Unavailable(_) => {
            tracing::error!(error = %error, "membership fetch failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(serde_json::json!({ "error": error.to_string() }))).into_response()
}
