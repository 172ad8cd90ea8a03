//! Signing key lifecycle over the persistent key pool.

use chrono::{DateTime, Utc};
use tracing::info;

use bazar_core::config::KeyConfig;
use bazar_core::error::AppError;
use bazar_core::result::AppResult;
use bazar_database::repositories::SigningKeyRepository;
use bazar_entity::signing_key::SigningKey;

use super::material::generate_signing_key;

/// Manages the pool of RSA signing keys.
///
/// Rotation is overlap-based: a new key becomes the signer while old keys
/// keep verifying until their `expires_at` passes, so tokens issued before
/// a rotation stay valid for their whole lifetime.
#[derive(Debug, Clone)]
pub struct SigningKeyStore {
    repo: SigningKeyRepository,
    config: KeyConfig,
}

impl SigningKeyStore {
    /// Create a new key store.
    pub fn new(repo: SigningKeyRepository, config: KeyConfig) -> Self {
        Self { repo, config }
    }

    /// All keys usable for verification at instant `t`, newest first.
    pub async fn active_keys_at(&self, t: DateTime<Utc>) -> AppResult<Vec<SigningKey>> {
        self.repo.find_active_at(t).await
    }

    /// The key used for signing at instant `t`: the most recently created
    /// active key.
    pub async fn primary_signing_key_at(&self, t: DateTime<Utc>) -> AppResult<SigningKey> {
        self.repo
            .find_active_at(t)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::crypto("No active signing key. Ensure key bootstrap has run.")
            })
    }

    /// Create a signing key if none is active at `t`.
    ///
    /// Invoked once at authority startup; a failure here is fatal because
    /// the service could never issue tokens.
    pub async fn ensure_bootstrap(&self, t: DateTime<Utc>) -> AppResult<()> {
        if !self.repo.find_active_at(t).await?.is_empty() {
            info!("Active signing key found, skipping key generation");
            return Ok(());
        }

        info!(
            bits = self.config.rsa_bits,
            expiry_days = self.config.expiry_days,
            "No active signing key, generating RSA key pair"
        );

        let bits = self.config.rsa_bits;
        let expiry_days = self.config.expiry_days;
        let key = tokio::task::spawn_blocking(move || generate_signing_key(bits, expiry_days, t))
            .await
            .map_err(|e| AppError::internal(format!("Key generation task failed: {e}")))??;

        self.repo.insert(&key).await?;
        info!(kid = %key.kid, expires_at = ?key.expires_at, "Signing key generated");
        Ok(())
    }

    /// Generate and persist a new primary key without expiring the old
    /// ones (overlap rotation).
    pub async fn rotate(&self, t: DateTime<Utc>) -> AppResult<SigningKey> {
        let bits = self.config.rsa_bits;
        let expiry_days = self.config.expiry_days;
        let key = tokio::task::spawn_blocking(move || generate_signing_key(bits, expiry_days, t))
            .await
            .map_err(|e| AppError::internal(format!("Key generation task failed: {e}")))??;

        self.repo.insert(&key).await?;
        info!(kid = %key.kid, "Signing key rotated");
        Ok(key)
    }
}
