//! Core type definitions used across the Seatbook workspace.

pub mod id;

pub use id::{EmployeeId, SeatId};
