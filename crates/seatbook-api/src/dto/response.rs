//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::{EmployeeId, SeatId};
use seatbook_entity::employee::EmployeeSummary;
use seatbook_entity::seat::{Seat, SeatStatus};
use seatbook_service::{Booking, Release};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// One seat as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatResponse {
    /// Seat number.
    pub id: SeatId,
    /// Occupancy.
    pub status: SeatStatus,
    /// Booking price in tokens.
    pub price: i64,
    /// Current occupant.
    pub occupant: Option<EmployeeId>,
    /// When the seat was booked.
    pub booking_time: Option<DateTime<Utc>>,
}

impl From<Seat> for SeatResponse {
    fn from(seat: Seat) -> Self {
        Self {
            id: seat.id,
            status: seat.status,
            price: seat.price,
            occupant: seat.occupant,
            booking_time: seat.booking_time,
        }
    }
}

/// Result of a successful booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    /// The seat, now occupied by the caller.
    pub seat: SeatResponse,
    /// Tokens charged.
    pub tokens_charged: i64,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            seat: booking.seat.into(),
            tokens_charged: booking.tokens_charged,
        }
    }
}

/// Result of a successful release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// The freed seat.
    pub seat_id: SeatId,
    /// Tokens returned to the caller.
    pub tokens_refunded: i64,
}

impl From<Release> for ReleaseResponse {
    fn from(release: Release) -> Self {
        Self {
            seat_id: release.seat_id,
            tokens_refunded: release.tokens_refunded,
        }
    }
}

/// The caller's profile and booking state.
pub type ProfileResponse = EmployeeSummary;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status (`ok` or `degraded`).
    pub status: String,
    /// Server version.
    pub version: String,
    /// Document store backend in use.
    pub store: String,
    /// Whether the store answered its health probe.
    pub store_healthy: bool,
}
