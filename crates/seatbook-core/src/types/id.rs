//! Newtype wrappers for the two domain identifiers.
//!
//! Using distinct types prevents accidentally passing a seat number where
//! an employee identifier is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sequential seat number, `1..=N`, assigned at pool initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(pub u32);

impl SeatId {
    /// Create a seat identifier.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the raw seat number.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeatId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| AppError::validation(format!("Invalid seat id: '{s}'")))
    }
}

impl From<u32> for SeatId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Stable employee identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Create an employee identifier, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self, AppError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::validation("Employee id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_id_from_str() {
        let id: SeatId = " 42 ".parse().expect("should parse");
        assert_eq!(id, SeatId(42));
        assert!("forty-two".parse::<SeatId>().is_err());
    }

    #[test]
    fn test_seat_ids_order_numerically() {
        let mut ids = vec![SeatId(10), SeatId(2), SeatId(1)];
        ids.sort();
        assert_eq!(ids, vec![SeatId(1), SeatId(2), SeatId(10)]);
    }

    #[test]
    fn test_employee_id_rejects_blank() {
        assert!(EmployeeId::new("   ").is_err());
        assert_eq!(EmployeeId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&SeatId(3)).expect("serialize");
        assert_eq!(json, "3");

        let employee = EmployeeId::new("alice@example.com").unwrap();
        let json = serde_json::to_string(&employee).expect("serialize");
        assert_eq!(json, "\"alice@example.com\"");
    }
}
