//! Document search routes
//!
//! Query parameter names (`q`, `configType`, `page`, `pageSize`,
//! `publicOnly`) are part of the public contract.

use crate::api::handlers::search;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents/search", get(search::search_documents))
        .route("/api/documents/search/", get(search::search_documents))
        .route(
            "/api/documents/search/configs",
            get(search::list_document_types),
        )
}
