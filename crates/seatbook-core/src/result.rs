//! Convenience result type alias for Seatbook.

use crate::error::AppError;

/// A specialized `Result` type for Seatbook operations.
pub type AppResult<T> = Result<T, AppError>;
