//! Authenticated identities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use seatbook_core::result::AppResult;
use seatbook_core::types::EmployeeId;

/// The employee behind a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Manager.
    pub manager: Option<String>,
}

/// Turns an opaque credential into an [`Identity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `credential`. Fails with an `Authentication` error when it is
    /// invalid or expired.
    async fn resolve(&self, credential: &str) -> AppResult<Identity>;
}
