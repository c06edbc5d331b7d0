//! Seat listing handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, SeatResponse};
use crate::error::ApiError;
use crate::extractors::AuthEmployee;
use crate::state::AppState;

/// GET /api/seats
pub async fn list_seats(
    State(state): State<AppState>,
    _auth: AuthEmployee,
) -> Result<Json<ApiResponse<Vec<SeatResponse>>>, ApiError> {
    let seats = state.coordinator.list_seats().await?;
    Ok(Json(ApiResponse::ok(
        seats.into_iter().map(SeatResponse::from).collect(),
    )))
}
