//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_service::ReservationError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict
            | ErrorKind::AlreadyBooked
            | ErrorKind::SeatUnavailable
            | ErrorKind::TransactionConflict => StatusCode::CONFLICT,
            ErrorKind::CooldownActive => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::StoreUnavailable | ErrorKind::ExternalService => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ErrorKind::Database
            | ErrorKind::Internal
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn retry_after(&self) -> Option<HeaderValue> {
        if self.0.kind != ErrorKind::CooldownActive {
            return None;
        }
        let seconds = self
            .0
            .details
            .as_ref()?
            .get("remaining_seconds")?
            .as_i64()?;
        HeaderValue::from_str(&seconds.to_string()).ok()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Request failed");
        } else {
            tracing::debug!(kind = %self.0.kind, error = %self.0.message, "Request rejected");
        }

        let retry_after = self.retry_after();
        let body = ApiErrorResponse {
            success: false,
            error: self.0.kind.to_string(),
            message: self.0.message,
            details: self.0.details,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}
