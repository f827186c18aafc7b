//! Service layer

pub mod search;

pub use search::{SearchRequest, SearchService};
