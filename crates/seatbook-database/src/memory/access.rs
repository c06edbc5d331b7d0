//! Operation logic shared by the memory store and its transactions.
//!
//! Each function runs against an access view. The store supplies a view
//! over its locked state; a transaction supplies a view that overlays its
//! staged writes and records what it read.

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use crate::document::{DocKey, Document, Filter, Update};
use crate::store::{UpdateResult, batch_keys, seed_upsert};

pub(crate) trait ReadAccess {
    fn get(&mut self, collection: &str, key: &DocKey) -> Option<Document>;

    /// Every document of the collection, ordered by key.
    fn scan(&mut self, collection: &str) -> Vec<(DocKey, Document)>;
}

pub(crate) trait WriteAccess: ReadAccess {
    fn put(&mut self, collection: &str, key: DocKey, document: Document);
}

fn candidates<R: ReadAccess>(
    access: &mut R,
    collection: &str,
    filter: &Filter,
) -> AppResult<Vec<(DocKey, Document)>> {
    let docs = match filter.id() {
        Some(id) => {
            let key = DocKey::from_value(id)?;
            access
                .get(collection, &key)
                .map(|doc| vec![(key, doc)])
                .unwrap_or_default()
        }
        None => access.scan(collection),
    };
    Ok(docs
        .into_iter()
        .filter(|(_, doc)| filter.matches(doc))
        .collect())
}

pub(crate) fn find_one<R: ReadAccess>(
    access: &mut R,
    collection: &str,
    filter: &Filter,
) -> AppResult<Option<Document>> {
    Ok(candidates(access, collection, filter)?
        .into_iter()
        .next()
        .map(|(_, doc)| doc))
}

pub(crate) fn find<R: ReadAccess>(
    access: &mut R,
    collection: &str,
    filter: &Filter,
) -> AppResult<Vec<Document>> {
    Ok(candidates(access, collection, filter)?
        .into_iter()
        .map(|(_, doc)| doc)
        .collect())
}

pub(crate) fn count<R: ReadAccess>(
    access: &mut R,
    collection: &str,
    filter: &Filter,
) -> AppResult<u64> {
    Ok(candidates(access, collection, filter)?.len() as u64)
}

/// Returns the result and the document as it stands afterwards.
pub(crate) fn update_one<W: WriteAccess>(
    access: &mut W,
    collection: &str,
    filter: &Filter,
    update: &Update,
    upsert: bool,
) -> AppResult<(UpdateResult, Option<Document>)> {
    if let Some((key, mut doc)) = candidates(access, collection, filter)?.into_iter().next() {
        let modified = update.apply(&mut doc, false)?;
        if modified {
            access.put(collection, key, doc.clone());
        }
        let result = UpdateResult {
            matched: 1,
            modified: u64::from(modified),
            upserted: false,
        };
        return Ok((result, Some(doc)));
    }

    if !upsert {
        return Ok((UpdateResult::default(), None));
    }

    let (key, doc) = seed_upsert(filter, update)?;
    if access.get(collection, &key).is_some() {
        return Err(AppError::conflict(format!(
            "Document {key} already exists in '{collection}'"
        )));
    }
    access.put(collection, key, doc.clone());
    let result = UpdateResult {
        matched: 0,
        modified: 0,
        upserted: true,
    };
    Ok((result, Some(doc)))
}

pub(crate) fn insert_many<W: WriteAccess>(
    access: &mut W,
    collection: &str,
    documents: Vec<Document>,
) -> AppResult<u64> {
    let keys = batch_keys(&documents)?;
    for key in &keys {
        if access.get(collection, key).is_some() {
            return Err(AppError::conflict(format!(
                "Document {key} already exists in '{collection}'"
            )));
        }
    }
    let inserted = keys.len() as u64;
    for (key, doc) in keys.into_iter().zip(documents) {
        access.put(collection, key, doc);
    }
    Ok(inserted)
}
