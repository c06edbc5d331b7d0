//! ID token claims.

use serde::{Deserialize, Serialize};

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::EmployeeId;

use crate::identity::Identity;

/// Fallback display name when the token carries none.
const DEFAULT_NAME: &str = "User";

/// Claims read from a verified ID token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Subject.
    #[serde(default)]
    pub sub: Option<String>,
    /// Directory user id, preferred over `sub`.
    #[serde(default)]
    pub uid: Option<String>,
    /// Login name.
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Department.
    #[serde(default)]
    pub department: Option<String>,
    /// Manager.
    #[serde(default)]
    pub manager: Option<String>,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl IdTokenClaims {
    /// Map the claims onto an identity.
    pub fn into_identity(self) -> AppResult<Identity> {
        let preferred_username = non_blank(self.preferred_username);
        let id = non_blank(self.uid)
            .or_else(|| preferred_username.clone())
            .or_else(|| non_blank(self.sub))
            .ok_or_else(|| AppError::authentication("Token carries no subject"))?;

        let name = non_blank(self.name)
            .or(preferred_username)
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Ok(Identity {
            employee_id: EmployeeId::new(id)?,
            name,
            email: non_blank(self.email),
            department: non_blank(self.department),
            manager: non_blank(self.manager),
        })
    }
}
