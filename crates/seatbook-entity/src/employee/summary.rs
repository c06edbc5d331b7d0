//! Read model returned to callers asking for an employee profile.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::{EmployeeId, SeatId};

use super::model::Employee;

/// Profile plus booking state, with the cooldown resolved against a clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Manager.
    pub manager: Option<String>,
    /// Seat currently held.
    pub active_seat: Option<SeatId>,
    /// Seats booked and not yet released.
    pub booked_seats: Vec<SeatId>,
    /// Running charge for active bookings.
    pub tokens_spent: i64,
    /// Most recent booking.
    pub last_booking_at: Option<DateTime<Utc>>,
    /// Seconds until the employee may book again (0 when allowed).
    pub cooldown_remaining_seconds: i64,
}

impl EmployeeSummary {
    /// Build a summary, evaluating the cooldown window at `now`.
    pub fn from_employee(employee: Employee, now: DateTime<Utc>, window: Duration) -> Self {
        let cooldown_remaining_seconds = employee
            .cooldown_remaining(now, window)
            .map(|d| ((d.num_milliseconds() + 999) / 1000).max(1))
            .unwrap_or(0);

        Self {
            employee_id: employee.employee_id,
            name: employee.profile.name,
            email: employee.profile.email,
            department: employee.profile.department,
            manager: employee.profile.manager,
            active_seat: employee.active_seat,
            booked_seats: employee.booked_seats.into_iter().collect(),
            tokens_spent: employee.tokens_spent,
            last_booking_at: employee.last_booking_at,
            cooldown_remaining_seconds,
        }
    }
}
