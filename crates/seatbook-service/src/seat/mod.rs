//! Seat occupancy.

pub mod registry;

pub use registry::SeatRegistry;
