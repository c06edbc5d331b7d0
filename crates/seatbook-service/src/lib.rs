//! # seatbook-service
//!
//! Booking rules for Seatbook. The [`SeatRegistry`] owns seat occupancy,
//! the [`EmployeeDirectory`] owns employee records, and the
//! [`ReservationCoordinator`] applies book and release as single store
//! transactions spanning both.

pub mod employee;
pub mod error;
mod fields;
pub mod reservation;
pub mod seat;

pub use employee::EmployeeDirectory;
pub use error::ReservationError;
pub use reservation::{Booking, ReservationCoordinator, Release};
pub use seat::SeatRegistry;
