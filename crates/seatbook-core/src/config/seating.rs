//! Seat pool and booking policy configuration.

use serde::{Deserialize, Serialize};

/// What happens to the booking cooldown when an employee releases a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CooldownPolicy {
    /// Releasing a seat clears `last_booking_at`; the next booking is not gated.
    #[default]
    ResetOnRelease,
    /// `last_booking_at` survives a release, so the window keeps running across seats.
    CarryOver,
}

/// Seat pool sizing and booking rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingConfig {
    /// Number of seats created on first start.
    #[serde(default = "default_seat_count")]
    pub seat_count: u32,
    /// Tokens charged per booking.
    #[serde(default = "default_seat_price")]
    pub seat_price: i64,
    /// Minimum minutes between two bookings by the same employee.
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i64,
    /// Cooldown behaviour on release.
    #[serde(default)]
    pub cooldown_policy: CooldownPolicy,
    /// Attempts after the first one when a store transaction aborts on a write conflict.
    #[serde(default = "default_max_transaction_retries")]
    pub max_transaction_retries: u32,
}

impl SeatingConfig {
    /// The cooldown window as a duration.
    pub fn cooldown_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cooldown_minutes)
    }
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            seat_count: default_seat_count(),
            seat_price: default_seat_price(),
            cooldown_minutes: default_cooldown_minutes(),
            cooldown_policy: CooldownPolicy::default(),
            max_transaction_retries: default_max_transaction_retries(),
        }
    }
}

fn default_seat_count() -> u32 {
    100
}

fn default_seat_price() -> i64 {
    5
}

fn default_cooldown_minutes() -> i64 {
    45
}

fn default_max_transaction_retries() -> u32 {
    3
}
