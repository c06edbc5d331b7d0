//! JSON documents, keys, and the query language over them.

pub mod filter;
pub mod key;
pub mod update;

use serde::Serialize;
use serde::de::DeserializeOwned;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

pub use filter::{Condition, Filter};
pub use key::DocKey;
pub use update::{Update, UpdateOp};

/// A stored document: a JSON object whose `_id` field is its primary key.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Name of the primary key field.
pub const ID_FIELD: &str = "_id";

/// Serialize an entity into a document.
pub fn to_document<T: Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AppError::internal(format!(
            "Expected an object when serializing document, got {other}"
        ))),
    }
}

/// Deserialize an entity from a document.
pub fn from_document<T: DeserializeOwned>(document: Document) -> AppResult<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(document))?)
}
