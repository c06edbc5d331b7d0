//! Caller profile handler.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::dto::response::{ApiResponse, ProfileResponse};
use crate::error::ApiError;
use crate::extractors::AuthEmployee;
use crate::state::AppState;

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthEmployee,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let profile = state
        .coordinator
        .get_profile(auth.employee_id(), Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}
