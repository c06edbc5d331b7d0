//! Document operations against a single PostgreSQL connection.
//!
//! Equality conditions are pushed down as JSONB containment; the full
//! filter is re-checked on the decoded bodies.

use serde_json::Value;
use sqlx::PgConnection;
use sqlx::types::Json;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use super::error::{is_unique_violation, map_sqlx_error};
use crate::document::{DocKey, Document, Filter, Update};
use crate::store::{UpdateResult, batch_keys, seed_upsert};

const SELECT: &str = "SELECT body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY doc_id";

const SELECT_FOR_UPDATE: &str =
    "SELECT body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY doc_id FOR UPDATE";

/// Fetch matching documents ordered by key. `lock` takes row locks.
pub(crate) async fn select(
    conn: &mut PgConnection,
    collection: &str,
    filter: &Filter,
    lock: bool,
) -> AppResult<Vec<(DocKey, Document)>> {
    let sql = if lock { SELECT_FOR_UPDATE } else { SELECT };
    let rows: Vec<(Json<Document>,)> = sqlx::query_as(sql)
        .bind(collection)
        .bind(Json(Value::Object(filter.equalities())))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to query documents", e))?;

    let mut docs = Vec::with_capacity(rows.len());
    for (Json(body),) in rows {
        if filter.matches(&body) {
            docs.push((DocKey::of(&body)?, body));
        }
    }
    docs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(docs)
}

async fn write_body(
    conn: &mut PgConnection,
    collection: &str,
    key: &DocKey,
    body: &Document,
) -> AppResult<()> {
    sqlx::query(
        "UPDATE documents SET body = $3, version = version + 1, updated_at = NOW() \
         WHERE collection = $1 AND doc_id = $2",
    )
    .bind(collection)
    .bind(Json(key.to_value()))
    .bind(Json(body))
    .execute(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("Failed to update document", e))?;
    Ok(())
}

async fn insert_body(
    conn: &mut PgConnection,
    collection: &str,
    key: &DocKey,
    body: &Document,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO documents (collection, doc_id, body) VALUES ($1, $2, $3)")
        .bind(collection)
        .bind(Json(key.to_value()))
        .bind(Json(body))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn count(
    conn: &mut PgConnection,
    collection: &str,
    filter: &Filter,
    lock: bool,
) -> AppResult<u64> {
    Ok(select(conn, collection, filter, lock).await?.len() as u64)
}

/// Update the first match under a row lock. Must run inside a transaction.
pub(crate) async fn update_one(
    conn: &mut PgConnection,
    collection: &str,
    filter: &Filter,
    update: &Update,
    upsert: bool,
) -> AppResult<(UpdateResult, Option<Document>)> {
    if let Some((key, mut doc)) = select(conn, collection, filter, true).await?.into_iter().next() {
        let modified = update.apply(&mut doc, false)?;
        if modified {
            write_body(conn, collection, &key, &doc).await?;
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
    insert_body(conn, collection, &key, &doc)
        .await
        .map_err(|e| map_sqlx_error("Failed to upsert document", e))?;
    let result = UpdateResult {
        matched: 0,
        modified: 0,
        upserted: true,
    };
    Ok((result, Some(doc)))
}

/// Insert a batch. Must run inside a transaction so a collision undoes it.
pub(crate) async fn insert_many(
    conn: &mut PgConnection,
    collection: &str,
    documents: Vec<Document>,
) -> AppResult<u64> {
    let keys = batch_keys(&documents)?;
    for (key, doc) in keys.iter().zip(&documents) {
        insert_body(conn, collection, key, doc).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::with_source(
                    seatbook_core::ErrorKind::Conflict,
                    format!("Document {key} already exists in '{collection}'"),
                    e,
                )
            } else {
                map_sqlx_error("Failed to insert document", e)
            }
        })?;
    }
    Ok(keys.len() as u64)
}
