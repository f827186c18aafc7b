//! Search service - paginated document search
//!
//! Orchestrates one search by:
//! - resolving the document-type descriptor and the page window
//! - compiling the query into match clauses (short-circuiting empty queries)
//! - resolving the caller's identity into a visibility predicate
//! - executing the merged plan in a single store round-trip
//! - shaping the result envelope

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use docsearch_plan::{
    compile, paging, visibility, DescriptorCatalog, Identity, ResultEnvelope, SearchPlan,
};

use crate::db::{DocumentStore, StoreError};
use crate::metrics::{
    SEARCH_RESULTS, SEARCH_TOTAL, SHORT_CIRCUIT_TOTAL, STORE_DURATION_SECONDS,
};
use crate::{Error, Result};

/// `document_type` label for searches naming an unconfigured type.
const UNKNOWN_DOCUMENT_TYPE: &str = "unknown";

/// One inbound search, constructed per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub document_type: String,
    pub query_text: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Skip identity resolution and return public documents only.
    pub public_only: bool,
}

impl SearchRequest {
    pub fn new(document_type: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            query_text: query_text.into(),
            page: None,
            page_size: None,
            public_only: false,
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn public_only(mut self) -> Self {
        self.public_only = true;
        self
    }
}

/// Search service coordinates descriptor lookup, planning and the store call
pub struct SearchService {
    catalog: DescriptorCatalog,
    store: Arc<dyn DocumentStore>,
    store_timeout: Duration,
}

impl SearchService {
    pub fn new(
        catalog: DescriptorCatalog,
        store: Arc<dyn DocumentStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            store_timeout,
        }
    }

    pub fn catalog(&self) -> &DescriptorCatalog {
        &self.catalog
    }

    /// Execute one search.
    ///
    /// `identity` is only awaited when the plan needs it: empty queries and
    /// `public_only` requests never poll it.
    pub async fn search<F>(&self, request: SearchRequest, identity: F) -> Result<ResultEnvelope>
    where
        F: Future<Output = Identity> + Send,
    {
        let Some(descriptor) = self.catalog.get(&request.document_type) else {
            SEARCH_TOTAL
                .with_label_values(&[UNKNOWN_DOCUMENT_TYPE, "unknown_type"])
                .inc();
            return Err(Error::NotFoundConfig(request.document_type));
        };
        let document_type = descriptor.document_type.as_str();

        tracing::debug!(
            document_type,
            query = %request.query_text,
            page = ?request.page,
            page_size = ?request.page_size,
            public_only = request.public_only,
            "Search requested"
        );

        let window = paging::resolve(
            request.page,
            request.page_size,
            descriptor.default_page_size,
            descriptor.max_page_size,
        );

        let clauses = compile(&descriptor.searchable_fields, &request.query_text);
        if clauses.is_empty() {
            tracing::debug!(document_type, "Empty query; skipping store");
            SHORT_CIRCUIT_TOTAL.inc();
            SEARCH_TOTAL
                .with_label_values(&[document_type, "empty_query"])
                .inc();
            return Ok(ResultEnvelope::empty(window));
        }

        let identity = if request.public_only {
            Identity::Anonymous
        } else {
            identity.await
        };
        let predicate = visibility::build(&identity, &descriptor.visibility);
        let plan = SearchPlan::assemble(&descriptor, clauses, predicate, window);

        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.store_timeout,
            self.store
                .execute_search_plan(&descriptor.collection, &plan),
        )
        .await
        .unwrap_or_else(|_| {
            Err(StoreError::Unavailable(format!(
                "{} store did not answer within {}ms",
                self.store.backend(),
                self.store_timeout.as_millis()
            )))
        });
        let elapsed = started.elapsed();
        STORE_DURATION_SECONDS
            .with_label_values(&[document_type])
            .observe(elapsed.as_secs_f64());

        let page = match outcome {
            Ok(page) => page,
            Err(err) => {
                let label = if err.is_unavailable() {
                    "store_unavailable"
                } else {
                    "store_error"
                };
                SEARCH_TOTAL.with_label_values(&[document_type, label]).inc();
                tracing::error!(
                    document_type,
                    backend = self.store.backend(),
                    error = %err,
                    "Search store call failed"
                );
                return Err(err.into());
            }
        };

        let envelope = ResultEnvelope::from_page(window, page.total_count, page.documents);

        SEARCH_TOTAL.with_label_values(&[document_type, "ok"]).inc();
        SEARCH_RESULTS
            .with_label_values(&[document_type])
            .observe(envelope.total_count as f64);
        tracing::info!(
            document_type,
            total_count = envelope.total_count,
            page = envelope.current_page,
            anonymous = identity.is_anonymous(),
            duration_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(envelope)
    }
}
