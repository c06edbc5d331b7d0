//! Equality filters over top-level document fields.

use serde_json::Value;

use super::{Document, ID_FIELD};

/// A single field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field is present and equal to the value.
    Eq(String, Value),
    /// Field is absent or differs from the value.
    Ne(String, Value),
    /// Field is absent or null.
    IsNull(String),
}

impl Condition {
    fn matches(&self, document: &Document) -> bool {
        match self {
            Self::Eq(field, value) => document.get(field) == Some(value),
            Self::Ne(field, value) => document.get(field) != Some(value),
            Self::IsNull(field) => document.get(field).is_none_or(Value::is_null),
        }
    }
}

/// A conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the document with the given `_id`.
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self::all().eq(ID_FIELD, id)
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field.into(), value.into()));
        self
    }

    /// Require `field != value`.
    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Ne(field.into(), value.into()));
        self
    }

    /// Require `field` to be absent or null.
    pub fn is_null(mut self, field: impl Into<String>) -> Self {
        self.conditions.push(Condition::IsNull(field.into()));
        self
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }

    /// The conditions, in insertion order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// The `_id` this filter pins, if any.
    pub fn id(&self) -> Option<&Value> {
        self.conditions.iter().find_map(|c| match c {
            Condition::Eq(field, value) if field == ID_FIELD => Some(value),
            _ => None,
        })
    }

    /// Equality conditions as a document.
    ///
    /// Used to seed upserted documents and for containment pushdown.
    pub fn equalities(&self) -> Document {
        self.conditions
            .iter()
            .filter_map(|c| match c {
                Condition::Eq(field, value) => Some((field.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}
