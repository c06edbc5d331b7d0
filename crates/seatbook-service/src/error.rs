//! Booking outcomes the caller can act on.

use chrono::Duration;
use thiserror::Error;

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::types::{EmployeeId, SeatId};

/// Why a booking or release was refused.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The employee must release their current seat first.
    #[error("Employee {employee_id} already holds seat {seat_id}")]
    AlreadyBooked {
        /// The employee.
        employee_id: EmployeeId,
        /// The seat they hold.
        seat_id: SeatId,
    },

    /// The cooldown since the last booking has not elapsed.
    #[error("Booking cooldown active, {} seconds remaining", ceil_seconds(.remaining))]
    CooldownActive {
        /// Time left in the window.
        remaining: Duration,
    },

    /// The seat does not exist or is already occupied.
    #[error("Seat {0} is not available")]
    SeatUnavailable(SeatId),

    /// The seat does not exist.
    #[error("Seat {0} not found")]
    NotFound(SeatId),

    /// The seat is not held by the caller.
    #[error("Seat {seat_id} is not booked by {employee_id}")]
    Forbidden {
        /// The seat.
        seat_id: SeatId,
        /// The caller.
        employee_id: EmployeeId,
    },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Whole seconds, rounded up so a blocked caller never sees zero.
pub(crate) fn ceil_seconds(duration: &Duration) -> i64 {
    let millis = duration.num_milliseconds().max(0);
    ((millis + 999) / 1000).max(1)
}

impl ReservationError {
    /// Whether re-running the whole operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let message = err.to_string();
        match err {
            ReservationError::AlreadyBooked { seat_id, .. } => {
                AppError::new(ErrorKind::AlreadyBooked, message)
                    .with_details(serde_json::json!({ "active_seat": seat_id }))
            }
            ReservationError::CooldownActive { remaining } => {
                AppError::new(ErrorKind::CooldownActive, message).with_details(
                    serde_json::json!({ "remaining_seconds": ceil_seconds(&remaining) }),
                )
            }
            ReservationError::SeatUnavailable(seat_id) => {
                AppError::new(ErrorKind::SeatUnavailable, message)
                    .with_details(serde_json::json!({ "seat_id": seat_id }))
            }
            ReservationError::NotFound(_) => AppError::not_found(message),
            ReservationError::Forbidden { .. } => AppError::authorization(message),
            ReservationError::Store(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_reports_remaining_seconds() {
        let err: AppError = ReservationError::CooldownActive {
            remaining: Duration::minutes(43),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::CooldownActive);
        assert_eq!(
            err.details,
            Some(serde_json::json!({ "remaining_seconds": 2580 }))
        );
    }

    #[test]
    fn test_ceil_seconds_never_reports_zero() {
        assert_eq!(ceil_seconds(&Duration::milliseconds(1)), 1);
        assert_eq!(ceil_seconds(&Duration::milliseconds(1001)), 2);
        assert_eq!(ceil_seconds(&Duration::seconds(30)), 30);
    }

    #[test]
    fn test_forbidden_maps_to_authorization() {
        let err: AppError = ReservationError::Forbidden {
            seat_id: SeatId(3),
            employee_id: EmployeeId::new("bob").unwrap(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_only_store_conflicts_are_transient() {
        assert!(ReservationError::Store(AppError::transaction_conflict("abort")).is_transient());
        assert!(!ReservationError::Store(AppError::store_unavailable("down")).is_transient());
        assert!(!ReservationError::SeatUnavailable(SeatId(1)).is_transient());
    }
}
