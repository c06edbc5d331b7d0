//! Results of successful reservation operations.

use serde::{Deserialize, Serialize};

use seatbook_core::types::{EmployeeId, SeatId};
use seatbook_entity::seat::Seat;

/// A committed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The seat, now occupied.
    pub seat: Seat,
    /// The employee holding it.
    pub employee_id: EmployeeId,
    /// Tokens charged for the booking.
    pub tokens_charged: i64,
}

/// A committed release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// The freed seat.
    pub seat_id: SeatId,
    /// Tokens returned to the employee.
    pub tokens_refunded: i64,
}
