//! Where key sets come from.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use tracing::{debug, error};

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;

/// Supplies the current key set.
#[async_trait]
pub trait JwksSource: Send + Sync {
    /// Fetch the full key set.
    async fn fetch(&self) -> AppResult<JwkSet>;
}

/// Fetches the key set from the identity provider's JWKS endpoint.
#[derive(Debug, Clone)]
pub struct HttpJwksSource {
    client: reqwest::Client,
    url: String,
}

impl HttpJwksSource {
    /// Create a source with a bounded request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl JwksSource for HttpJwksSource {
    async fn fetch(&self) -> AppResult<JwkSet> {
        debug!(url = %self.url, "Fetching JWKS");

        let fetched = async {
            self.client
                .get(&self.url)
                .send()
                .await?
                .error_for_status()?
                .json::<JwkSet>()
                .await
        }
        .await;

        fetched.map_err(|e| {
            error!(url = %self.url, error = %e, "Failed to fetch JWKS");
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to fetch JWKS: {e}"),
                e,
            )
        })
    }
}

/// A fixed key set, for tests and offline deployments.
#[derive(Debug, Clone)]
pub struct StaticJwksSource {
    keys: JwkSet,
}

impl StaticJwksSource {
    /// Wrap a key set.
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    /// Parse a key set from its JSON representation.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl JwksSource for StaticJwksSource {
    async fn fetch(&self) -> AppResult<JwkSet> {
        Ok(self.keys.clone())
    }
}
