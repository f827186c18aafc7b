//! Database layer - document stores and query building

pub mod memory;
pub mod postgres;
pub mod query_builder;
pub mod string_normalization;
pub mod traits;

pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use traits::{DocumentStore, StoreError, StorePage};
