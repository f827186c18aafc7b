//! Core traits for document store backends

use async_trait::async_trait;
use docsearch_plan::{ProjectedDocument, SearchPlan};
use thiserror::Error;

/// Failures a store can report while executing a plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached: connection refused, pool exhausted,
    /// timeout or cancellation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but failed to execute the plan.
    #[error("store query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// One page of results plus the size of the filtered set it was cut from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePage {
    /// Projected documents in plan order (score descending, identifier ascending).
    pub documents: Vec<ProjectedDocument>,
    pub total_count: u64,
}

impl StorePage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Storage capability consumed by the search service
///
/// Implementations evaluate a [`SearchPlan`] against one collection:
/// documents must match at least one clause and the visibility predicate,
/// and both the page and `total_count` must come from the same filtered set
/// in a single round-trip.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute a search plan against `collection`
    ///
    /// # Errors
    /// * `Unavailable` - the store could not be reached in time
    /// * `Query` - the store rejected or failed the plan
    async fn execute_search_plan(
        &self,
        collection: &str,
        plan: &SearchPlan,
    ) -> Result<StorePage, StoreError>;

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}
