//! Stored field names and value encodings shared by the services.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

pub(crate) mod seat {
    pub const STATUS: &str = "status";
    pub const OCCUPANT: &str = "occupant";
    pub const BOOKING_TIME: &str = "booking_time";
}

pub(crate) mod employee {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const DEPARTMENT: &str = "department";
    pub const MANAGER: &str = "manager";
    pub const ACTIVE_SEAT: &str = "active_seat";
    pub const LAST_BOOKING_AT: &str = "last_booking_at";
    pub const BOOKED_SEATS: &str = "booked_seats";
    pub const TOKENS_SPENT: &str = "tokens_spent";
    pub const CREATED_AT: &str = "created_at";
    pub const LAST_SEEN_AT: &str = "last_seen_at";
}

/// Encode a timestamp the way chrono's serde support does.
pub(crate) fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
