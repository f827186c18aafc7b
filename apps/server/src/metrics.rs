//! Metrics collection for the search server
//!
//! This module defines and manages Prometheus metrics for monitoring search traffic.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "docsearch_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "docsearch_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "docsearch_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// HTTP response size in bytes
    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "docsearch_http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "path", "status"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
    )
    .expect("Failed to register HTTP_RESPONSE_SIZE_BYTES");

    // Search Metrics

    /// Searches by document type and outcome (ok, empty_query, unknown_type, store_unavailable, store_error)
    ///
    /// Searches for an unconfigured document type are counted under
    /// `document_type="unknown"` so caller input never becomes a label value.
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "docsearch_search_total",
        "Total number of searches",
        &["document_type", "outcome"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Matches per search (total count, not page length)
    pub static ref SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "docsearch_search_results",
        "Number of documents matched by a search",
        &["document_type"],
        vec![0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0]
    )
    .expect("Failed to register SEARCH_RESULTS");

    /// Store round-trip duration
    pub static ref STORE_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "docsearch_store_duration_seconds",
        "Document store round-trip duration in seconds",
        &["document_type"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    )
    .expect("Failed to register STORE_DURATION_SECONDS");

    /// Identity resolutions that failed and fell back to anonymous
    pub static ref IDENTITY_DEGRADED_TOTAL: IntCounter = register_int_counter!(
        "docsearch_identity_degraded_total",
        "Identity resolution failures downgraded to anonymous"
    )
    .expect("Failed to register IDENTITY_DEGRADED_TOTAL");

    /// Searches answered without a store call because the query was empty
    pub static ref SHORT_CIRCUIT_TOTAL: IntCounter = register_int_counter!(
        "docsearch_short_circuit_total",
        "Searches short-circuited by an empty query"
    )
    .expect("Failed to register SHORT_CIRCUIT_TOTAL");
}

/// Helper to sanitize path for metrics labels (limit cardinality)
///
/// Known routes keep their path; anything else collapses to `/other` so
/// random URLs cannot create new label values.
pub fn sanitize_path(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    match trimmed {
        "" | "/" => "/".to_string(),
        "/health" | "/metrics" | "/api/documents/search" | "/api/documents/search/configs" => {
            trimmed.to_string()
        }
        _ => "/other".to_string(),
    }
}
