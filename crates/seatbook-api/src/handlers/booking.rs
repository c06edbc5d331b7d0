//! Book and release handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use validator::Validate;

use seatbook_core::error::AppError;
use seatbook_core::types::SeatId;

use crate::dto::request::BookRequest;
use crate::dto::response::{ApiResponse, BookingResponse, ReleaseResponse};
use crate::error::ApiError;
use crate::extractors::AuthEmployee;
use crate::state::AppState;

/// POST /api/book
pub async fn book(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Json(req): Json<BookRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid booking request: {e}")))?;

    let booking = state
        .coordinator
        .book_seat(auth.employee_id(), SeatId::new(req.seat_id), Utc::now())
        .await?;

    Ok(Json(ApiResponse::ok(booking.into())))
}

/// POST /api/release/{seat_id}
pub async fn release(
    State(state): State<AppState>,
    auth: AuthEmployee,
    Path(seat_id): Path<u32>,
) -> Result<Json<ApiResponse<ReleaseResponse>>, ApiError> {
    let release = state
        .coordinator
        .release_seat(auth.employee_id(), SeatId::new(seat_id))
        .await?;

    Ok(Json(ApiResponse::ok(release.into())))
}
