//! Refresh token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_entity::refresh_token::RefreshToken;

/// Repository for refresh token records. Lookup is by deterministic hash;
/// the cleartext token never reaches the database.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new refresh token hash.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at, revoked) \
             VALUES ($1, $2, $3, FALSE) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to persist refresh token", e)
        })
    }

    /// Find a refresh token record by its hash.
    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Mark a single refresh token as revoked.
    pub async fn revoke(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Refresh token {id} not found")));
        }
        Ok(())
    }

    /// Revoke every non-revoked refresh token for a user. Returns the
    /// number of tokens revoked.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND NOT revoked",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user refresh tokens", e)
        })?;

        Ok(result.rows_affected())
    }

    /// List a user's live (non-revoked, unexpired) refresh tokens.
    pub async fn find_active_for_user(&self, user_id: Uuid) -> AppResult<Vec<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens \
             WHERE user_id = $1 AND NOT revoked AND expires_at > NOW() \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list refresh tokens", e)
        })
    }
}
