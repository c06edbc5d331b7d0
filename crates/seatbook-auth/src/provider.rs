//! JWKS-backed identity provider.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use tracing::debug;

use seatbook_core::config::AuthConfig;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;

use crate::claims::IdTokenClaims;
use crate::identity::{Identity, IdentityProvider};
use crate::jwks::{HttpJwksSource, JwksCache, JwksSource};

/// Verifies ID tokens signed by a key from the provider's key set.
#[derive(Debug)]
pub struct JwksIdentityProvider {
    cache: JwksCache,
    issuer: String,
    audience: Option<String>,
    algorithms: Vec<Algorithm>,
    leeway_seconds: u64,
}

impl JwksIdentityProvider {
    /// Build a provider that fetches keys from `auth.jwks_url`.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let source = HttpJwksSource::new(
            config.jwks_url.clone(),
            Duration::from_secs(config.http_timeout_seconds),
        )?;
        Self::with_source(config, Arc::new(source))
    }

    /// Build a provider over any key source.
    pub fn with_source(config: &AuthConfig, source: Arc<dyn JwksSource>) -> AppResult<Self> {
        let algorithms = config
            .algorithms
            .iter()
            .map(|name| {
                Algorithm::from_str(name).map_err(|_| {
                    AppError::configuration(format!("Unsupported JWT algorithm '{name}'"))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let cache = JwksCache::new(
            source,
            Duration::from_secs(config.jwks_cache_ttl_seconds),
            Duration::from_secs(config.jwks_min_refresh_interval_seconds),
        );

        Ok(Self {
            cache,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            algorithms,
            leeway_seconds: config.leeway_seconds,
        })
    }

    /// The key cache, for invalidation on key rotation.
    pub fn cache(&self) -> &JwksCache {
        &self.cache
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.leeway = self.leeway_seconds;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

#[async_trait]
impl IdentityProvider for JwksIdentityProvider {
    async fn resolve(&self, credential: &str) -> AppResult<Identity> {
        let header = decode_header(credential)
            .map_err(|e| AppError::authentication(format!("Malformed token: {e}")))?;

        let kid = header
            .kid
            .ok_or_else(|| AppError::authentication("Token header missing key ID"))?;

        if !self.algorithms.contains(&header.alg) {
            return Err(AppError::authentication(format!(
                "Token algorithm {:?} is not allowed",
                header.alg
            )));
        }

        let key = self
            .cache
            .get(&kid)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid token key"))?;

        let data = decode::<IdTokenClaims>(credential, &key, &self.validation(header.alg))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::authentication("Token issuer mismatch")
                }
                jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    AppError::authentication("Token audience mismatch")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })?;

        let identity = data.claims.into_identity()?;
        debug!(employee_id = %identity.employee_id, "Resolved identity");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use seatbook_core::ErrorKind;
    use serde_json::{Value, json};

    use crate::jwks::StaticJwksSource;

    const SECRET: &str = "c2VhdGJvb2stdGVzdC1zaWduaW5nLWtleS0wMTIzNDU2";
    const ISSUER: &str = "https://idp.test";

    fn config(audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwks_url: "https://idp.test/jwks".to_string(),
            issuer: ISSUER.to_string(),
            audience: audience.map(str::to_string),
            algorithms: vec!["HS256".to_string()],
            ..Default::default()
        }
    }

    fn provider(audience: Option<&str>) -> JwksIdentityProvider {
        let keys = json!({
            "keys": [{ "kty": "oct", "kid": "test-key", "alg": "HS256", "k": SECRET }]
        });
        let source = StaticJwksSource::from_json(&keys.to_string()).unwrap();
        JwksIdentityProvider::with_source(&config(audience), Arc::new(source)).unwrap()
    }

    fn sign(kid: Option<&str>, claims: Value) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = kid.map(str::to_string);
        encode(&header, &claims, &EncodingKey::from_base64_secret(SECRET).unwrap()).unwrap()
    }

    fn claims(extra: Value) -> Value {
        let mut base = json!({
            "sub": "sub-alice",
            "uid": "alice",
            "name": "Alice",
            "email": "alice@example.com",
            "iss": ISSUER,
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
            base.extend(extra);
        }
        base
    }

    #[tokio::test]
    async fn test_resolves_valid_token() {
        let token = sign(Some("test-key"), claims(json!({})));
        let identity = provider(None).resolve(&token).await.unwrap();
        assert_eq!(identity.employee_id.as_str(), "alice");
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_rejects_missing_kid() {
        let token = sign(None, claims(json!({})));
        let err = provider(None).resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_rejects_unknown_kid() {
        let token = sign(Some("rotated-away"), claims(json!({})));
        let err = provider(None).resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_rejects_expired_token() {
        let token = sign(
            Some("test-key"),
            claims(json!({ "exp": chrono::Utc::now().timestamp() - 3600 })),
        );
        let err = provider(None).resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(err.message.contains("expired"));
    }

    #[tokio::test]
    async fn test_rejects_wrong_issuer() {
        let token = sign(Some("test-key"), claims(json!({ "iss": "https://evil.test" })));
        let err = provider(None).resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_rejects_algorithm_outside_allow_list() {
        let mut config = config(None);
        config.algorithms = vec!["RS256".to_string()];
        let keys = json!({ "keys": [{ "kty": "oct", "kid": "test-key", "k": SECRET }] });
        let source = StaticJwksSource::from_json(&keys.to_string()).unwrap();
        let provider = JwksIdentityProvider::with_source(&config, Arc::new(source)).unwrap();

        let token = sign(Some("test-key"), claims(json!({})));
        let err = provider.resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_audience_checked_only_when_configured() {
        let token = sign(Some("test-key"), claims(json!({ "aud": "other-app" })));
        assert!(provider(None).resolve(&token).await.is_ok());

        let err = provider(Some("seatbook")).resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_unknown_algorithm_is_a_configuration_error() {
        let mut config = config(None);
        config.algorithms = vec!["NONE42".to_string()];
        let source = StaticJwksSource::from_json(r#"{"keys":[]}"#).unwrap();
        let err = JwksIdentityProvider::with_source(&config, Arc::new(source)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
