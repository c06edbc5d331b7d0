//! HTTP request handlers, one module per domain.

pub mod booking;
pub mod employee;
pub mod health;
pub mod seat;
