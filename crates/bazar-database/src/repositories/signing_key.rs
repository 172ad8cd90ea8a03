//! Signing key repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_entity::signing_key::SigningKey;

/// Repository for persisted RSA signing keys.
///
/// The table is append-only in practice: keys are inserted at bootstrap or
/// rotation and age out via `expires_at`; nothing deletes rows.
#[derive(Debug, Clone)]
pub struct SigningKeyRepository {
    pool: PgPool,
}

impl SigningKeyRepository {
    /// Create a new signing key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a newly generated key pair.
    pub async fn insert(&self, key: &SigningKey) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO signing_keys \
                 (kid, public_key_pem, private_key_pem, algorithm, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&key.kid)
        .bind(&key.public_key_pem)
        .bind(&key.private_key_pem)
        .bind(&key.algorithm)
        .bind(key.created_at)
        .bind(key.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert signing key", e))?;
        Ok(())
    }

    /// All keys active at instant `t` (no expiry, or expiry strictly after
    /// `t`), newest first so the primary key is the head of the list.
    pub async fn find_active_at(&self, t: DateTime<Utc>) -> AppResult<Vec<SigningKey>> {
        sqlx::query_as::<_, SigningKey>(
            "SELECT * FROM signing_keys \
             WHERE expires_at IS NULL OR expires_at > $1 \
             ORDER BY created_at DESC",
        )
        .bind(t)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load signing keys", e))
    }

    /// Find a key by its identifier.
    pub async fn find_by_kid(&self, kid: &str) -> AppResult<Option<SigningKey>> {
        sqlx::query_as::<_, SigningKey>("SELECT * FROM signing_keys WHERE kid = $1")
            .bind(kid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find signing key", e)
            })
    }
}
