//! PostgreSQL document store.
//!
//! Documents live in the `documents` table as JSONB. Transactional reads
//! take row locks, so writers to the same document serialize; concurrent
//! aborts surface as `TransactionConflict`.

mod error;
mod query;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

use seatbook_core::result::AppResult;

use self::error::{is_key_collision, map_sqlx_error};
use crate::document::{Document, Filter, Update};
use crate::store::{DocumentOps, DocumentStore, StoreTransaction, UpdateResult};

/// Document store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin_raw(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))
    }

    async fn commit_raw(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }

    async fn update_committed(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        let mut tx = self.begin_raw().await?;
        let (result, _) = query::update_one(&mut tx, collection, filter, update, upsert).await?;
        Self::commit_raw(tx).await?;
        Ok(result)
    }
}

#[async_trait]
impl DocumentOps for PostgresStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("Failed to acquire connection", e))?;
        let docs = query::select(&mut conn, collection, filter, false).await?;
        Ok(docs.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        match self.update_committed(collection, filter, update, upsert).await {
            // A concurrent upsert inserted the document first; it now matches.
            Err(e) if upsert && is_key_collision(&e) => {
                debug!(collection, "Upsert lost an insert race, applying as update");
                self.update_committed(collection, filter, update, upsert).await
            }
            result => result,
        }
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<Option<Document>> {
        let mut tx = self.begin_raw().await?;
        let (_, doc) = query::update_one(&mut tx, collection, filter, update, false).await?;
        Self::commit_raw(tx).await?;
        Ok(doc)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> AppResult<u64> {
        let mut tx = self.begin_raw().await?;
        let inserted = query::insert_many(&mut tx, collection, documents).await?;
        Self::commit_raw(tx).await?;
        Ok(inserted)
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("Failed to acquire connection", e))?;
        query::count(&mut conn, collection, filter, false).await
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.begin_raw().await?;
        Ok(Box::new(PostgresTransaction { tx: Mutex::new(tx) }))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("Health check failed", e))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// A PostgreSQL transaction. Dropping it rolls back.
pub struct PostgresTransaction {
    tx: Mutex<Transaction<'static, Postgres>>,
}

#[async_trait]
impl DocumentOps for PostgresTransaction {
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>> {
        let mut tx = self.tx.lock().await;
        let docs = query::select(&mut tx, collection, filter, true).await?;
        Ok(docs.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        let mut tx = self.tx.lock().await;
        query::update_one(&mut tx, collection, filter, update, upsert)
            .await
            .map(|(result, _)| result)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<Option<Document>> {
        let mut tx = self.tx.lock().await;
        query::update_one(&mut tx, collection, filter, update, false)
            .await
            .map(|(_, doc)| doc)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> AppResult<u64> {
        let mut tx = self.tx.lock().await;
        query::insert_many(&mut tx, collection, documents).await
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let mut tx = self.tx.lock().await;
        query::count(&mut tx, collection, filter, true).await
    }
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        PostgresStore::commit_raw(self.tx.into_inner()).await?;
        debug!("Committed postgres transaction");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx
            .into_inner()
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("Failed to roll back transaction", e))
    }
}
