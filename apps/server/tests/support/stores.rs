use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use docsearch_plan::SearchPlan;
use docsearch_server::db::{DocumentStore, StoreError, StorePage};

/// Store that never answers within any reasonable timeout.
#[derive(Debug, Default)]
pub struct StalledStore;

#[async_trait]
impl DocumentStore for StalledStore {
    async fn execute_search_plan(
        &self,
        _collection: &str,
        _plan: &SearchPlan,
    ) -> Result<StorePage, StoreError> {
        tokio::time::sleep(Duration::from_secs(300)).await;
        Ok(StorePage::empty())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "stalled"
    }
}

/// Store that fails every call with the same error.
#[derive(Debug)]
pub struct FailingStore {
    error: StoreError,
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn new(error: StoreError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn execute_search_plan(
        &self,
        _collection: &str,
        _plan: &SearchPlan,
    ) -> Result<StorePage, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(self.error.clone())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
