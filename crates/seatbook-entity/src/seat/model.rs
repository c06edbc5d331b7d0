//! Seat entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::{EmployeeId, SeatId};

use super::status::SeatStatus;

/// A single bookable seat in the office pool.
///
/// `occupant` and `booking_time` are set exactly when `status` is
/// [`SeatStatus::Occupied`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Seat number, immutable after pool initialization.
    #[serde(rename = "_id")]
    pub id: SeatId,
    /// Current occupancy.
    pub status: SeatStatus,
    /// Tokens charged to occupy the seat.
    pub price: i64,
    /// Employee currently holding the seat.
    #[serde(default)]
    pub occupant: Option<EmployeeId>,
    /// When the seat became occupied.
    #[serde(default)]
    pub booking_time: Option<DateTime<Utc>>,
}

impl Seat {
    /// Create an unoccupied seat.
    pub fn available(id: SeatId, price: i64) -> Self {
        Self {
            id,
            status: SeatStatus::Available,
            price,
            occupant: None,
            booking_time: None,
        }
    }

    /// Check whether the seat can be booked.
    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }

    /// Check whether the given employee holds this seat.
    pub fn is_occupied_by(&self, employee_id: &EmployeeId) -> bool {
        self.status == SeatStatus::Occupied && self.occupant.as_ref() == Some(employee_id)
    }

    /// Check the occupant/status invariant.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            SeatStatus::Available => self.occupant.is_none() && self.booking_time.is_none(),
            SeatStatus::Occupied => self.occupant.is_some() && self.booking_time.is_some(),
        }
    }
}
