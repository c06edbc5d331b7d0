//! Store and transaction traits.

use async_trait::async_trait;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use crate::document::{DocKey, Document, Filter, Update};

/// Outcome of [`DocumentOps::update_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents that matched the filter (0 or 1).
    pub matched: u64,
    /// Documents whose contents changed.
    pub modified: u64,
    /// Whether the update inserted a new document.
    pub upserted: bool,
}

/// Document reads and single-document writes.
///
/// Implemented by stores (each call is atomic on its own) and by
/// transactions (calls are atomic together on commit).
#[async_trait]
pub trait DocumentOps: Send + Sync {
    /// Find the first document matching `filter`, in `_id` order.
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>>;

    /// Find every matching document, ordered by `_id` ascending.
    async fn find(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>>;

    /// Update the first matching document.
    ///
    /// With `upsert`, a missing document is created from the filter's
    /// equality conditions before the update is applied.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> AppResult<UpdateResult>;

    /// Update the first matching document and return it after the update.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<Option<Document>>;

    /// Insert documents. Fails with `Conflict` and inserts nothing if any
    /// `_id` already exists or repeats within the batch.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> AppResult<u64>;

    /// Count matching documents.
    async fn count_documents(&self, collection: &str, filter: &Filter) -> AppResult<u64>;
}

/// A document store backend.
#[async_trait]
pub trait DocumentStore: DocumentOps {
    /// Start a transaction.
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> AppResult<()>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}

/// A unit of work spanning several documents.
///
/// Writes are invisible to other callers until [`commit`](Self::commit).
/// Dropping the transaction discards them.
#[async_trait]
pub trait StoreTransaction: DocumentOps {
    /// Make every staged write visible atomically.
    ///
    /// Fails with `TransactionConflict` when a concurrent writer touched a
    /// document this transaction read.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every staged write.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Build the document an upsert inserts when nothing matched.
pub(crate) fn seed_upsert(filter: &Filter, update: &Update) -> AppResult<(DocKey, Document)> {
    let mut document = filter.equalities();
    update.apply(&mut document, true)?;
    let key = DocKey::of(&document)
        .map_err(|_| AppError::validation("Upsert requires an _id in the filter or update"))?;
    Ok((key, document))
}

/// Check a batch for keys repeated within it and return the keys in order.
pub(crate) fn batch_keys(documents: &[Document]) -> AppResult<Vec<DocKey>> {
    let mut seen = std::collections::BTreeSet::new();
    documents
        .iter()
        .map(|document| {
            let key = DocKey::of(document)?;
            if !seen.insert(key.clone()) {
                return Err(AppError::conflict(format!("Duplicate _id {key} in batch")));
            }
            Ok(key)
        })
        .collect()
}
