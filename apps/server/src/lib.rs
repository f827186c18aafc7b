//! docsearch server
//!
//! Paginated full-text search over configurable document collections:
//! - Per-type field/index descriptors loaded from configuration
//! - Query compilation into weighted match clauses
//! - Owner-or-public visibility filtering from the caller's bearer token
//! - Single round-trip count + page execution against PostgreSQL or memory

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
