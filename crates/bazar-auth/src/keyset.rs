//! Cached remote key set for validators.
//!
//! The gateway and every resource-service trust kernel verify tokens
//! against the authority's published JWKS. The cache refreshes in the
//! background on a fixed interval; an `UnknownKid` during verification
//! (the signature of a key rotation) triggers one immediate out-of-band
//! refresh before the request is failed. When the authority is
//! unreachable the previous snapshot stays authoritative until it exceeds
//! the configured maximum staleness.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use bazar_core::error::AppError;
use bazar_core::result::AppResult;

use crate::jwks::JwksDocument;
use crate::jwt::{Claims, TokenError, TokenVerifier, VerificationKeySet};

/// A fetched key set with its fetch instant.
#[derive(Debug, Clone)]
struct Snapshot {
    key_set: VerificationKeySet,
    fetched_at: Instant,
}

/// Periodically refreshed view of the authority's published keys.
#[derive(Debug)]
pub struct RemoteKeySetCache {
    jwks_url: String,
    client: reqwest::Client,
    max_stale: Duration,
    snapshot: RwLock<Option<Snapshot>>,
    verifier: TokenVerifier,
}

impl RemoteKeySetCache {
    /// Create a cache for the given JWKS endpoint.
    pub fn new(jwks_url: String, fetch_timeout: Duration, max_stale: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            jwks_url,
            client,
            max_stale,
            snapshot: RwLock::new(None),
            verifier: TokenVerifier::new(),
        })
    }

    /// Fetch the key set once and replace the snapshot.
    ///
    /// On failure the previous snapshot is left in place; staleness is
    /// enforced at read time.
    pub async fn refresh(&self) -> AppResult<()> {
        let document: JwksDocument = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AppError::upstream_unavailable(format!("JWKS fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::upstream_unavailable(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::upstream_unavailable(format!("JWKS parse failed: {e}")))?;

        let key_set = VerificationKeySet::from_jwks(&document)?;
        debug!(keys = key_set.len(), url = %self.jwks_url, "Key set refreshed");

        *self.snapshot.write().await = Some(Snapshot {
            key_set,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    /// The current key set, if a snapshot exists and is not past the
    /// staleness limit.
    pub async fn current(&self) -> AppResult<VerificationKeySet> {
        let guard = self.snapshot.read().await;
        match guard.as_ref() {
            Some(snapshot) if snapshot.fetched_at.elapsed() <= self.max_stale => {
                Ok(snapshot.key_set.clone())
            }
            Some(_) => Err(AppError::upstream_unavailable(
                "Key set snapshot exceeded maximum staleness",
            )),
            None => Err(AppError::upstream_unavailable("Key set not yet fetched")),
        }
    }

    /// Verify a token against the cached key set at instant `now`.
    ///
    /// An `UnknownKid` failure triggers one immediate refresh and a
    /// single retry, which is what keeps key rotation downtime-free.
    pub async fn verify(&self, token: &str, now: DateTime<Utc>) -> AppResult<Claims> {
        let key_set = self.current().await?;

        match self.verifier.verify(token, &key_set, now) {
            Err(TokenError::UnknownKid(kid)) => {
                info!(%kid, "Unknown kid; forcing key set refresh");
                self.refresh().await?;
                let key_set = self.current().await?;
                self.verifier
                    .verify(token, &key_set, now)
                    .map_err(AppError::from)
            }
            other => other.map_err(AppError::from),
        }
    }

    /// Spawn the periodic background refresh loop.
    ///
    /// The first fetch happens immediately so validators become useful as
    /// soon as the authority answers; failures are logged and retried on
    /// the next tick.
    pub fn spawn_refresh_loop(self: &Arc<Self>, interval: Duration) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                if let Err(e) = cache.refresh().await {
                    warn!(error = %e, "Background key set refresh failed");
                }
                tokio::time::sleep(interval).await;
            }
        });
    }

    /// Seed the snapshot directly (tests and single-process setups).
    pub async fn seed(&self, key_set: VerificationKeySet) {
        *self.snapshot.write().await = Some(Snapshot {
            key_set,
            fetched_at: Instant::now(),
        });
    }
}
