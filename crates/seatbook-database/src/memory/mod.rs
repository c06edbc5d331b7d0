//! In-process document store.
//!
//! All collections live behind one `RwLock`. Every stored document carries
//! a version that changes on each write. Transactions are optimistic: they
//! stage writes privately, remember the version of everything they read,
//! and validate those versions under the write lock when committing.

mod access;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use self::access::{ReadAccess, WriteAccess};
use crate::document::{DocKey, Document, Filter, Update};
use crate::store::{DocumentOps, DocumentStore, StoreTransaction, UpdateResult};

#[derive(Debug)]
struct Entry {
    version: u64,
    body: Document,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<String, BTreeMap<DocKey, Entry>>,
    clock: u64,
}

impl MemoryState {
    fn entry(&self, collection: &str, key: &DocKey) -> Option<&Entry> {
        self.collections.get(collection).and_then(|c| c.get(key))
    }

    fn keys(&self, collection: &str) -> BTreeSet<DocKey> {
        self.collections
            .get(collection)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn write(&mut self, collection: &str, key: DocKey, body: Document) {
        self.clock += 1;
        let version = self.clock;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key, Entry { version, body });
    }
}

struct ReadView<'a>(&'a MemoryState);

impl ReadAccess for ReadView<'_> {
    fn get(&mut self, collection: &str, key: &DocKey) -> Option<Document> {
        self.0.entry(collection, key).map(|e| e.body.clone())
    }

    fn scan(&mut self, collection: &str) -> Vec<(DocKey, Document)> {
        self.0
            .collections
            .get(collection)
            .map(|c| c.iter().map(|(k, e)| (k.clone(), e.body.clone())).collect())
            .unwrap_or_default()
    }
}

struct StoreView<'a>(&'a mut MemoryState);

impl ReadAccess for StoreView<'_> {
    fn get(&mut self, collection: &str, key: &DocKey) -> Option<Document> {
        ReadView(&*self.0).get(collection, key)
    }

    fn scan(&mut self, collection: &str) -> Vec<(DocKey, Document)> {
        ReadView(&*self.0).scan(collection)
    }
}

impl WriteAccess for StoreView<'_> {
    fn put(&mut self, collection: &str, key: DocKey, document: Document) {
        self.0.write(collection, key, document);
    }
}

/// Shared, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentOps for MemoryStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>> {
        let state = self.state.read().await;
        access::find_one(&mut ReadView(&state), collection, filter)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>> {
        let state = self.state.read().await;
        access::find(&mut ReadView(&state), collection, filter)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        let mut state = self.state.write().await;
        access::update_one(&mut StoreView(&mut state), collection, filter, update, upsert)
            .map(|(result, _)| result)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<Option<Document>> {
        let mut state = self.state.write().await;
        access::update_one(&mut StoreView(&mut state), collection, filter, update, false)
            .map(|(_, doc)| doc)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        access::insert_many(&mut StoreView(&mut state), collection, documents)
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let state = self.state.read().await;
        access::count(&mut ReadView(&state), collection, filter)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(MemoryTransaction {
            state: Arc::clone(&self.state),
            staged: Mutex::new(TxState::default()),
        }))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[derive(Debug, Default)]
struct TxState {
    /// Version observed for each document read; `None` if it was absent.
    reads: HashMap<(String, DocKey), Option<u64>>,
    /// Key set observed by each collection scan.
    scans: HashMap<String, BTreeSet<DocKey>>,
    writes: BTreeMap<(String, DocKey), Document>,
}

struct TxView<'a> {
    base: &'a MemoryState,
    tx: &'a mut TxState,
}

impl ReadAccess for TxView<'_> {
    fn get(&mut self, collection: &str, key: &DocKey) -> Option<Document> {
        let slot = (collection.to_string(), key.clone());
        if let Some(doc) = self.tx.writes.get(&slot) {
            return Some(doc.clone());
        }
        let entry = self.base.entry(collection, key);
        self.tx
            .reads
            .entry(slot)
            .or_insert(entry.map(|e| e.version));
        entry.map(|e| e.body.clone())
    }

    fn scan(&mut self, collection: &str) -> Vec<(DocKey, Document)> {
        let base = self.base;
        self.tx
            .scans
            .entry(collection.to_string())
            .or_insert_with(|| base.keys(collection));

        let mut merged = BTreeMap::new();
        if let Some(entries) = base.collections.get(collection) {
            for (key, entry) in entries {
                self.tx
                    .reads
                    .entry((collection.to_string(), key.clone()))
                    .or_insert(Some(entry.version));
                merged.insert(key.clone(), entry.body.clone());
            }
        }
        for ((c, key), doc) in &self.tx.writes {
            if c == collection {
                merged.insert(key.clone(), doc.clone());
            }
        }
        merged.into_iter().collect()
    }
}

impl WriteAccess for TxView<'_> {
    fn put(&mut self, collection: &str, key: DocKey, document: Document) {
        self.tx
            .writes
            .insert((collection.to_string(), key), document);
    }
}

/// Optimistic transaction over a [`MemoryStore`].
pub struct MemoryTransaction {
    state: Arc<RwLock<MemoryState>>,
    staged: Mutex<TxState>,
}

#[async_trait]
impl DocumentOps for MemoryTransaction {
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>> {
        let mut tx = self.staged.lock().await;
        let base = self.state.read().await;
        access::find_one(&mut TxView { base: &base, tx: &mut tx }, collection, filter)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>> {
        let mut tx = self.staged.lock().await;
        let base = self.state.read().await;
        access::find(&mut TxView { base: &base, tx: &mut tx }, collection, filter)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        let mut tx = self.staged.lock().await;
        let base = self.state.read().await;
        let mut view = TxView { base: &base, tx: &mut tx };
        access::update_one(&mut view, collection, filter, update, upsert).map(|(result, _)| result)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<Option<Document>> {
        let mut tx = self.staged.lock().await;
        let base = self.state.read().await;
        let mut view = TxView { base: &base, tx: &mut tx };
        access::update_one(&mut view, collection, filter, update, false).map(|(_, doc)| doc)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> AppResult<u64> {
        let mut tx = self.staged.lock().await;
        let base = self.state.read().await;
        access::insert_many(&mut TxView { base: &base, tx: &mut tx }, collection, documents)
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let mut tx = self.staged.lock().await;
        let base = self.state.read().await;
        access::count(&mut TxView { base: &base, tx: &mut tx }, collection, filter)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let this = *self;
        let tx = this.staged.into_inner();
        let mut state = this.state.write().await;

        for ((collection, key), observed) in &tx.reads {
            let current = state.entry(collection, key).map(|e| e.version);
            if current != *observed {
                debug!(%collection, %key, "Read set changed before commit");
                return Err(AppError::transaction_conflict(format!(
                    "Document {key} in '{collection}' was modified concurrently"
                )));
            }
        }
        for (collection, keys) in &tx.scans {
            if state.keys(collection) != *keys {
                debug!(%collection, "Scanned collection changed before commit");
                return Err(AppError::transaction_conflict(format!(
                    "Collection '{collection}' was modified concurrently"
                )));
            }
        }

        let writes = tx.writes.len();
        for ((collection, key), doc) in tx.writes {
            state.write(&collection, key, doc);
        }
        debug!(writes, "Committed memory transaction");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
