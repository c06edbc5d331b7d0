//! Primary keys.

use std::fmt;

use serde_json::Value;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use super::{Document, ID_FIELD};

/// The `_id` of a document. Integer keys sort before string keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocKey {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl DocKey {
    /// Interpret a JSON value as a key.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| AppError::validation(format!("Unsupported numeric _id: {n}"))),
            Value::String(s) => Ok(Self::Str(s.clone())),
            other => Err(AppError::validation(format!(
                "_id must be an integer or string, got {other}"
            ))),
        }
    }

    /// Extract the key of a document.
    pub fn of(document: &Document) -> AppResult<Self> {
        document
            .get(ID_FIELD)
            .ok_or_else(|| AppError::validation("Document has no _id"))
            .and_then(Self::from_value)
    }

    /// Convert back into the JSON representation.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}
