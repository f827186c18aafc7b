//! Layer factories for middleware

use axum::http::{HeaderValue, Method};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
};

/// CORS middleware
///
/// Without configured origins no CORS headers are emitted. The API is
/// read-only, so only `GET`, `HEAD` and `OPTIONS` are allowed.
pub fn cors(origins: &[String]) -> CorsLayer {
    let header_values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if header_values.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(header_values))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}

/// Compression middleware (gzip, brotli, deflate, zstd as negotiated)
pub fn compression() -> CompressionLayer {
    CompressionLayer::new()
}
