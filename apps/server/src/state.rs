//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::auth::{AuthManager, IdentityResolver};
use crate::config::{Config, StoreBackend};
use crate::db::{DocumentStore, MemoryDocumentStore, PostgresDocumentStore};
use crate::services::SearchService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub search_service: Arc<SearchService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Build state from configuration: connect the configured store and set
    /// up token validation.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.database.backend {
            StoreBackend::Postgres => {
                let store = PostgresDocumentStore::connect_lazy(&config.database)?;
                if config.database.run_migrations {
                    store.run_migrations().await?;
                }
                Arc::new(store)
            }
            StoreBackend::Memory => match &config.database.seed_path {
                Some(path) => Arc::new(MemoryDocumentStore::from_seed_file(path).await?),
                None => Arc::new(MemoryDocumentStore::new()),
            },
        };

        let config = Arc::new(config);
        let auth = AuthManager::new(config.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize authentication: {e}"))?;

        tracing::info!(
            backend = store.backend(),
            auth_enabled = auth.enabled(),
            "Application state initialized"
        );

        Self::from_shared(config, store, Arc::new(auth))
    }

    /// Build state around an existing store and identity resolver.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityResolver>,
    ) -> anyhow::Result<Self> {
        Self::from_shared(Arc::new(config), store, identity)
    }

    fn from_shared(
        config: Arc<Config>,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityResolver>,
    ) -> anyhow::Result<Self> {
        let catalog = config
            .catalog()
            .context("Invalid document type configuration")?;
        tracing::info!(
            document_types = ?catalog.iter().map(|d| d.document_type.as_str()).collect::<Vec<_>>(),
            "Loaded document types"
        );

        let search_service = Arc::new(SearchService::new(
            catalog,
            store.clone(),
            Duration::from_millis(config.search.store_timeout_ms),
        ));

        Ok(Self {
            config,
            search_service,
            identity,
            store,
        })
    }
}
