//! API route tables

pub mod metrics;
pub mod search;
