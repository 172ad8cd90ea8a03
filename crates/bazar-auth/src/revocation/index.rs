//! The revocation index: TTL-keyed blacklist plus per-user epochs.
//!
//! Single-token revocation blacklists the `jti` for exactly the token's
//! remaining lifetime. Logout-all is epoch-based: the user's epoch is set
//! to the revocation instant, and every token whose `iat` predates it is
//! rejected, including tokens minted on devices whose `jti` was never
//! observed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use bazar_cache::keys as cache_keys;
use bazar_core::config::FailMode;
use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_core::traits::cache::CacheProvider;

use crate::jwt::Claims;

/// Floor for blacklist TTLs so an entry for a token expiring right now
/// still outlives in-flight validations.
const MIN_BLACKLIST_TTL_SECONDS: u64 = 60;

/// Reads and writes the shared revocation state.
#[derive(Debug, Clone)]
pub struct RevocationIndex {
    cache: Arc<dyn CacheProvider>,
    fail_mode: FailMode,
    /// TTL for epoch entries: the refresh token max lifetime, after which
    /// no token issued before the epoch can still be alive.
    epoch_ttl: Duration,
}

impl RevocationIndex {
    /// Create a revocation index over the given cache backend.
    pub fn new(cache: Arc<dyn CacheProvider>, fail_mode: FailMode, epoch_ttl: Duration) -> Self {
        Self {
            cache,
            fail_mode,
            epoch_ttl,
        }
    }

    /// Mark a single access token as revoked for `ttl_seconds`.
    ///
    /// Write paths always fail closed: an unreachable store surfaces as an
    /// error so a logout never silently leaves the token alive.
    pub async fn revoke_token(&self, jti: &Uuid, ttl_seconds: u64) -> AppResult<()> {
        let ttl = Duration::from_secs(ttl_seconds.max(MIN_BLACKLIST_TTL_SECONDS));
        self.cache
            .set(&cache_keys::jwt_blacklist(jti), "revoked", ttl)
            .await?;
        debug!(%jti, ttl_seconds, "Access token blacklisted");
        Ok(())
    }

    /// Whether the given token id is blacklisted.
    pub async fn is_revoked(&self, jti: &Uuid) -> AppResult<bool> {
        match self.cache.exists(&cache_keys::jwt_blacklist(jti)).await {
            Ok(found) => Ok(found),
            Err(e) => self.handle_read_failure(e),
        }
    }

    /// Revoke every session of a user by setting their revocation epoch.
    pub async fn revoke_all_for_user(&self, user_id: &Uuid, now: DateTime<Utc>) -> AppResult<()> {
        self.cache
            .set(
                &cache_keys::user_revocation_epoch(user_id),
                &now.timestamp().to_string(),
                self.epoch_ttl,
            )
            .await?;
        debug!(%user_id, epoch = now.timestamp(), "User revocation epoch set");
        Ok(())
    }

    /// The user's revocation epoch, if one is set.
    pub async fn revocation_epoch(&self, user_id: &Uuid) -> AppResult<Option<i64>> {
        let value = match self
            .cache
            .get(&cache_keys::user_revocation_epoch(user_id))
            .await
        {
            Ok(value) => value,
            Err(e) => return self.handle_read_failure(e).map(|_| None),
        };
        Ok(value.and_then(|v| v.parse::<i64>().ok()))
    }

    /// Full revocation check for validated claims: blacklisted `jti`, or
    /// issued before the user's revocation epoch.
    pub async fn is_revoked_for(&self, claims: &Claims) -> AppResult<bool> {
        if self.is_revoked(&claims.jti).await? {
            return Ok(true);
        }
        if let Some(epoch) = self.revocation_epoch(&claims.sub).await? {
            if claims.iat < epoch {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Apply the configured fail mode to a read-path store failure.
    fn handle_read_failure(&self, err: AppError) -> AppResult<bool> {
        match self.fail_mode {
            FailMode::Open => {
                warn!(error = %err, "Revocation store unreachable; failing open");
                Ok(false)
            }
            FailMode::Closed => Err(AppError::new(
                ErrorKind::UpstreamUnavailable,
                "Revocation store unreachable",
            )),
        }
    }
}
