//! `AuthEmployee` extractor: verifies the bearer credential and records the employee.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use chrono::Utc;

use seatbook_auth::Identity;
use seatbook_core::error::AppError;
use seatbook_core::types::EmployeeId;

use crate::error::ApiError;
use crate::state::AppState;

/// The verified caller, available in handlers.
#[derive(Debug, Clone)]
pub struct AuthEmployee(pub Identity);

impl AuthEmployee {
    /// The caller's employee id.
    pub fn employee_id(&self) -> &EmployeeId {
        &self.0.employee_id
    }
}

impl std::ops::Deref for AuthEmployee {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthEmployee {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::authentication("Missing or malformed bearer token"))?;

        let identity = state.identity.resolve(bearer.token()).await?;

        // First sight of an employee creates their record; later requests only touch last_seen_at.
        state
            .coordinator
            .directory()
            .register(&identity, Utc::now())
            .await?;

        tracing::debug!(employee_id = %identity.employee_id, "Authenticated request");
        Ok(AuthEmployee(identity))
    }
}
