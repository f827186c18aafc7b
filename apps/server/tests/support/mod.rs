pub mod assertions;
pub mod fixtures;
pub mod stores;

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use docsearch_server::{
    api::create_router,
    auth::{AuthError, IdentityResolver, Principal},
    config::StoreBackend,
    db::{DocumentStore, MemoryDocumentStore},
    AppState, Config,
};
use tower::ServiceExt as _;

pub use assertions::*;
pub use fixtures::*;
pub use stores::*;

/// Header carrying the caller's subject in tests.
pub const TEST_USER_HEADER: &str = "x-test-user";
/// `x-test-user` value that makes identity resolution fail.
pub const BROKEN_IDENTITY: &str = "!invalid";

/// Identity resolver that trusts a plain header instead of a bearer token.
#[derive(Debug, Default)]
pub struct HeaderIdentity;

#[async_trait]
impl IdentityResolver for HeaderIdentity {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
        let Some(value) = headers.get(TEST_USER_HEADER) else {
            return Ok(None);
        };
        let subject = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("non-ascii test user".to_string()))?;
        if subject == BROKEN_IDENTITY {
            return Err(AuthError::Upstream("identity provider unreachable".to_string()));
        }
        Ok(Some(Principal::new(subject)))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Populated for apps built on the in-memory store.
    pub documents: Option<MemoryDocumentStore>,
}

impl TestApp {
    /// App over an in-memory store seeded with the standard fixtures.
    pub async fn new() -> anyhow::Result<Self> {
        Self::new_with_config(|_| {}).await
    }

    pub async fn new_with_config(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let store = MemoryDocumentStore::new();
        seed_standard_documents(&store).await;
        let mut app = Self::with_store(Arc::new(store.clone()), configure)?;
        app.documents = Some(store);
        Ok(app)
    }

    /// App over an arbitrary store; nothing is seeded.
    pub fn with_store(
        store: Arc<dyn DocumentStore>,
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Self> {
        let mut config = test_config();
        configure(&mut config);

        let state = AppState::from_parts(config, store, Arc::new(HeaderIdentity))
            .context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Self {
            router,
            state,
            documents: None,
        })
    }

    /// Number of store round-trips the memory store has served.
    pub fn store_calls(&self) -> usize {
        self.documents.as_ref().map_or(0, |d| d.search_calls())
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(Method::GET, path_and_query, &[])
            .await
    }

    pub async fn get_as(
        &self,
        user: &str,
        path_and_query: &str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(Method::GET, path_and_query, &[(TEST_USER_HEADER, user)])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .body(axum::body::Body::empty())
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }
}

/// Configuration shared by every test app: memory backend, no auth, and the
/// `articles` and `templates` document types.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.database.backend = StoreBackend::Memory;
    config.search.store_timeout_ms = 2_000;
    config
        .document_types
        .insert("articles".to_string(), articles_descriptor());
    config
        .document_types
        .insert("templates".to_string(), templates_descriptor());
    config
}
