//! Seat occupancy status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Occupancy state of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Nobody holds the seat.
    Available,
    /// An employee holds the seat.
    Occupied,
}

impl SeatStatus {
    /// Return the status as its stored lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = seatbook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            _ => Err(seatbook_core::AppError::validation(format!(
                "Invalid seat status: '{s}'. Expected one of: available, occupied"
            ))),
        }
    }
}
