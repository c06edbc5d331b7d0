//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying ID tokens against the identity provider's key set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// URL of the JSON Web Key Set.
    #[serde(default)]
    pub jwks_url: String,
    /// Expected `iss` claim.
    #[serde(default)]
    pub issuer: String,
    /// Expected `aud` claim; audience is not checked when unset.
    #[serde(default)]
    pub audience: Option<String>,
    /// Accepted signing algorithms.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
    /// How long a fetched key stays cached.
    #[serde(default = "default_jwks_ttl")]
    pub jwks_cache_ttl_seconds: u64,
    /// Minimum spacing between two key set fetches.
    #[serde(default = "default_min_refresh")]
    pub jwks_min_refresh_interval_seconds: u64,
    /// Timeout for the key set HTTP request.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Clock skew tolerance for `exp`/`nbf`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwks_url: String::new(),
            issuer: String::new(),
            audience: None,
            algorithms: default_algorithms(),
            jwks_cache_ttl_seconds: default_jwks_ttl(),
            jwks_min_refresh_interval_seconds: default_min_refresh(),
            http_timeout_seconds: default_http_timeout(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_algorithms() -> Vec<String> {
    vec!["RS256".to_string()]
}

fn default_jwks_ttl() -> u64 {
    3600
}

fn default_min_refresh() -> u64 {
    30
}

fn default_http_timeout() -> u64 {
    5
}

fn default_leeway() -> u64 {
    5
}
