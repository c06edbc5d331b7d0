//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Book seat request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookRequest {
    /// Seat to book.
    #[validate(range(min = 1, message = "seat_id must be a positive seat number"))]
    pub seat_id: u32,
}
