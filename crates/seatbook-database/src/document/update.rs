//! Field update operators.

use serde_json::Value;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use super::{Document, ID_FIELD};

/// A single update operator.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Overwrite a field.
    Set(String, Value),
    /// Set a field only when the update inserts a new document.
    SetOnInsert(String, Value),
    /// Add to an integer field; a missing field counts as zero.
    Inc(String, i64),
    /// Append to an array field unless the value is already present.
    AddToSet(String, Value),
    /// Remove every occurrence of a value from an array field.
    Pull(String, Value),
}

/// An ordered list of operators applied to one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `field`.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Set(field.into(), value.into()));
        self
    }

    /// Set `field` only on insert.
    pub fn set_on_insert(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::SetOnInsert(field.into(), value.into()));
        self
    }

    /// Add `delta` to integer `field`.
    pub fn inc(mut self, field: impl Into<String>, delta: i64) -> Self {
        self.ops.push(UpdateOp::Inc(field.into(), delta));
        self
    }

    /// Add `value` to array `field` if absent.
    pub fn add_to_set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::AddToSet(field.into(), value.into()));
        self
    }

    /// Remove `value` from array `field`.
    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Pull(field.into(), value.into()));
        self
    }

    /// The operators, in application order.
    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    /// Check whether the update has no operators.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the update in place.
    ///
    /// `inserting` enables `SetOnInsert`. Returns whether the document
    /// changed. On error the document may be partially updated, so callers
    /// apply to a copy.
    pub fn apply(&self, document: &mut Document, inserting: bool) -> AppResult<bool> {
        let mut modified = false;
        for op in &self.ops {
            modified |= match op {
                UpdateOp::Set(field, value) => set_field(document, field, value)?,
                UpdateOp::SetOnInsert(field, value) if inserting => {
                    set_field(document, field, value)?
                }
                UpdateOp::SetOnInsert(..) => false,
                UpdateOp::Inc(field, delta) => inc_field(document, field, *delta)?,
                UpdateOp::AddToSet(field, value) => add_to_set(document, field, value)?,
                UpdateOp::Pull(field, value) => pull(document, field, value)?,
            };
        }
        Ok(modified)
    }
}

fn set_field(document: &mut Document, field: &str, value: &Value) -> AppResult<bool> {
    match document.get(field) {
        Some(current) if current == value => Ok(false),
        Some(_) if field == ID_FIELD => Err(AppError::validation("_id is immutable")),
        _ => {
            document.insert(field.to_string(), value.clone());
            Ok(true)
        }
    }
}

fn inc_field(document: &mut Document, field: &str, delta: i64) -> AppResult<bool> {
    let current = match document.get(field) {
        None | Some(Value::Null) => 0,
        Some(value) => value.as_i64().ok_or_else(|| {
            AppError::validation(format!("Cannot increment non-integer field '{field}'"))
        })?,
    };
    let next = current
        .checked_add(delta)
        .ok_or_else(|| AppError::validation(format!("Increment overflows field '{field}'")))?;
    let existed = document.contains_key(field);
    document.insert(field.to_string(), Value::from(next));
    Ok(delta != 0 || !existed)
}

fn array_field<'a>(document: &'a mut Document, field: &str) -> AppResult<&'a mut Vec<Value>> {
    let slot = document
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut()
        .ok_or_else(|| AppError::validation(format!("Field '{field}' is not an array")))
}

fn add_to_set(document: &mut Document, field: &str, value: &Value) -> AppResult<bool> {
    let existed = document.contains_key(field);
    let items = array_field(document, field)?;
    if items.contains(value) {
        return Ok(!existed);
    }
    items.push(value.clone());
    Ok(true)
}

fn pull(document: &mut Document, field: &str, value: &Value) -> AppResult<bool> {
    match document.get_mut(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Array(items)) => {
            let before = items.len();
            items.retain(|item| item != value);
            Ok(items.len() != before)
        }
        Some(_) => Err(AppError::validation(format!(
            "Field '{field}' is not an array"
        ))),
    }
}
