//! Error types for the search server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to clients for any store failure. The detail is logged by
/// the search service where the failure happens.
pub const STORE_FAILURE_MESSAGE: &str = "Error performing search";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown document type: {0}")]
    NotFoundConfig(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Document store query failed: {0}")]
    StoreQuery(String),
}

impl Error {
    /// Stable tag sent to clients in `error.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidRequest(_) => "InvalidRequest",
            Error::NotFoundConfig(_) => "NotFoundConfig",
            Error::StoreUnavailable(_) => "StoreUnavailable",
            Error::StoreQuery(_) => "StoreQueryError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) | Error::NotFoundConfig(_) => StatusCode::BAD_REQUEST,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::StoreQuery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Error::StoreUnavailable(msg),
            StoreError::Query(msg) => Error::StoreQuery(msg),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::InvalidRequest(msg) => msg.clone(),
            Error::NotFoundConfig(_) => self.to_string(),
            Error::StoreUnavailable(_) | Error::StoreQuery(_) => STORE_FAILURE_MESSAGE.to_string(),
        };

        let body = Json(json!({
            "error": {
                "kind": self.kind(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
