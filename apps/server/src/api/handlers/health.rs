//! Health check handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health`: liveness plus document store reachability.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.store.backend();
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "docsearch",
                "store": "up",
                "backend": backend,
            })),
        ),
        Err(err) => {
            tracing::warn!(backend, error = %err, "Health check: document store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": "docsearch",
                    "store": "down",
                    "backend": backend,
                })),
            )
        }
    }
}
