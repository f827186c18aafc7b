//! PostgreSQL document store

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use docsearch_plan::SearchPlan;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};

use super::query_builder::{BindValue, SearchQuery};
use super::traits::{DocumentStore, StoreError, StorePage};
use crate::config::DatabaseConfig;

/// SQLSTATE for a statement cancelled by `statement_timeout`.
const QUERY_CANCELED: &str = "57014";

#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a bounded pool from configuration.
    ///
    /// The pool connects lazily, so an unreachable database surfaces as
    /// `StoreUnavailable` on the first search instead of failing startup.
    pub fn connect_lazy(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let options: PgConnectOptions = config
            .url
            .parse()
            .context("Invalid database.url")?;
        let options = options.options([(
            "statement_timeout",
            format!("{}s", config.statement_timeout_seconds),
        )]);

        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min_size)
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
            .connect_lazy_with(options);

        Ok(Self::new(pool))
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn execute_search_plan(
        &self,
        collection: &str,
        plan: &SearchPlan,
    ) -> Result<StorePage, StoreError> {
        let (sql, bind_values) = SearchQuery::new(collection, plan).build_sql();

        let mut query = sqlx::query(&sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::TextArray(vs) => query.bind(vs),
                BindValue::Int(v) => query.bind(v),
                BindValue::Float(v) => query.bind(v),
            };
        }

        let rows = query.fetch_all(&self.pool).await.map_err(classify)?;

        let mut total_count = 0u64;
        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let count: i64 = row.try_get("total_count").map_err(classify)?;
            total_count = u64::try_from(count).unwrap_or(0);

            let doc: Option<JsonValue> = row.try_get("doc").map_err(classify)?;
            let score: Option<f64> = row.try_get("score").map_err(classify)?;
            if let Some(doc) = doc {
                documents.push(plan.projection.project(&doc, score.unwrap_or(0.0)));
            }
        }

        Ok(StorePage {
            documents,
            total_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Split sqlx failures into "could not reach the store" and "the store
/// rejected the query".
pub(crate) fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
        sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}
