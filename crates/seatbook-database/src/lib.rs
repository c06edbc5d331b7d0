//! # seatbook-database
//!
//! Document store used by Seatbook. Collections hold JSON documents keyed
//! by `_id`; callers read and write them through [`DocumentOps`], either
//! directly against a store or inside a [`StoreTransaction`].
//!
//! Two backends are provided: an in-process [`MemoryStore`] and a
//! [`PostgresStore`] that keeps documents in a JSONB table.

pub mod connection;
pub mod document;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use tracing::info;

use seatbook_core::config::{DatabaseConfig, StoreBackend};
use seatbook_core::result::AppResult;

pub use connection::DatabasePool;
pub use document::{DocKey, Document, Filter, Update, from_document, to_document};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{DocumentOps, DocumentStore, StoreTransaction, UpdateResult};

/// Open the store selected by `database.backend`.
///
/// For PostgreSQL this connects the pool and applies pending migrations.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(PostgresStore::new(pool.into_pool())))
        }
    }
}
