//! Employee entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::{EmployeeId, SeatId};

/// Profile fields copied from the identity provider on first resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Department, when the provider supplies one.
    #[serde(default)]
    pub department: Option<String>,
    /// Manager, when the provider supplies one.
    #[serde(default)]
    pub manager: Option<String>,
}

/// An employee and their booking state.
///
/// At most one seat is active at a time, and `tokens_spent` equals the
/// price of the active seat (zero when there is none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier issued by the identity provider.
    #[serde(rename = "_id")]
    pub employee_id: EmployeeId,
    /// Profile fields.
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    /// Seat currently held.
    #[serde(default)]
    pub active_seat: Option<SeatId>,
    /// Most recent successful booking.
    #[serde(default)]
    pub last_booking_at: Option<DateTime<Utc>>,
    /// Seats booked and not yet released.
    #[serde(default)]
    pub booked_seats: BTreeSet<SeatId>,
    /// Running charge for active bookings.
    #[serde(default)]
    pub tokens_spent: i64,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last time the employee's identity was resolved.
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl Employee {
    /// Create a record with no booking history.
    pub fn new(employee_id: EmployeeId, profile: EmployeeProfile, now: DateTime<Utc>) -> Self {
        Self {
            employee_id,
            profile,
            active_seat: None,
            last_booking_at: None,
            booked_seats: BTreeSet::new(),
            tokens_spent: 0,
            created_at: Some(now),
            last_seen_at: Some(now),
        }
    }

    /// Time left before the employee may book again, if any.
    ///
    /// Returns `None` once `window` has fully elapsed since the last booking.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>, window: Duration) -> Option<Duration> {
        let last = self.last_booking_at?;
        let elapsed = now - last;
        if elapsed < window {
            Some(window - elapsed)
        } else {
            None
        }
    }
}
