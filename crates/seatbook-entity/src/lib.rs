//! # seatbook-entity
//!
//! Domain entity models for Seatbook. Every struct in this crate is the
//! typed form of a document held by the document store: seats live in the
//! `seats` collection and employees in the `employees` collection, both
//! keyed by `_id`.

pub mod employee;
pub mod seat;

/// Collection holding one document per seat.
pub const SEATS_COLLECTION: &str = "seats";

/// Collection holding one document per employee.
pub const EMPLOYEES_COLLECTION: &str = "employees";
