//! Request handlers for API endpoints
//!
//! Handlers turn query strings into service requests and service results
//! into JSON responses.

pub mod health;
pub mod metrics;
pub mod search;

pub use health::*;
pub use metrics::*;
pub use search::*;
