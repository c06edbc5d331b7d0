//! Per-key-id cache of decoding keys.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::DecodingKey;
use moka::future::Cache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use seatbook_core::result::AppResult;

use super::source::JwksSource;

/// Decoding keys indexed by `kid`.
///
/// A miss reloads the whole key set from the source, at most once per
/// `min_refresh_interval`. Concurrent misses wait on one refresh instead of
/// each hitting the source.
pub struct JwksCache {
    source: Arc<dyn JwksSource>,
    keys: Cache<String, DecodingKey>,
    last_refresh: Mutex<Option<Instant>>,
    min_refresh_interval: Duration,
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("cached_keys", &self.keys.entry_count())
            .field("min_refresh_interval", &self.min_refresh_interval)
            .finish()
    }
}

impl JwksCache {
    /// Create an empty cache.
    pub fn new(source: Arc<dyn JwksSource>, ttl: Duration, min_refresh_interval: Duration) -> Self {
        Self {
            source,
            keys: Cache::builder().time_to_live(ttl).build(),
            last_refresh: Mutex::new(None),
            min_refresh_interval,
        }
    }

    /// Look up the key for `kid`, refreshing the set on a miss.
    ///
    /// Returns `Ok(None)` when the key is unknown after a refresh, or when a
    /// refresh happened too recently to try again.
    pub async fn get(&self, kid: &str) -> AppResult<Option<DecodingKey>> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(Some(key));
        }

        let mut last_refresh = self.last_refresh.lock().await;
        if let Some(key) = self.keys.get(kid).await {
            return Ok(Some(key));
        }
        if let Some(at) = *last_refresh {
            if at.elapsed() < self.min_refresh_interval {
                debug!(kid, "JWKS refresh suppressed");
                return Ok(None);
            }
        }

        self.reload().await?;
        *last_refresh = Some(Instant::now());
        Ok(self.keys.get(kid).await)
    }

    /// Drop every cached key and allow an immediate refresh.
    pub async fn invalidate(&self) {
        self.keys.invalidate_all();
        *self.last_refresh.lock().await = None;
    }

    async fn reload(&self) -> AppResult<()> {
        let set = self.source.fetch().await?;
        let mut loaded = 0usize;
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                debug!("Skipping JWK without kid");
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    self.keys.insert(kid, key).await;
                    loaded += 1;
                }
                Err(e) => warn!(kid = %kid, error = %e, "Skipping unusable JWK"),
            }
        }
        info!(loaded, "JWKS refreshed");
        Ok(())
    }
}
