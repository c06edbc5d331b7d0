//! Booking and release workflows.

pub mod coordinator;
pub mod outcome;
mod retry;

pub use coordinator::ReservationCoordinator;
pub use outcome::{Booking, Release};
