//! User account repository implementation.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_entity::user::{CreateUserAccount, UserAccount};

/// Repository for user account CRUD and lookup.
#[derive(Debug, Clone)]
pub struct UserAccountRepository {
    pool: PgPool,
}

impl UserAccountRepository {
    /// Create a new user account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>("SELECT * FROM user_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive). Emails are unique per
    /// tenant, not globally; the earliest registration wins the lookup.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(
            "SELECT * FROM user_accounts WHERE LOWER(email) = LOWER($1) \
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by email", e))
    }

    /// Find a user by phone number. Same per-tenant uniqueness caveat as
    /// [`Self::find_by_email`].
    pub async fn find_by_phone(&self, phone: &str) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(
            "SELECT * FROM user_accounts WHERE phone = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by phone", e))
    }

    /// Check whether an email is already taken within a tenant.
    pub async fn email_exists_in_tenant(&self, email: &str, tenant_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_accounts \
             WHERE LOWER(email) = LOWER($1) AND tenant_id = $2",
        )
        .bind(email)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check email", e))?;
        Ok(count > 0)
    }

    /// Check whether a phone number is already taken within a tenant.
    pub async fn phone_exists_in_tenant(&self, phone: &str, tenant_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_accounts WHERE phone = $1 AND tenant_id = $2",
        )
        .bind(phone)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check phone", e))?;
        Ok(count > 0)
    }

    /// Create a new user account. The tenant-scoped unique indexes are the
    /// authoritative uniqueness check; violations map to the taken errors
    /// even when a concurrent registration slips past the precheck.
    pub async fn create<'e, E>(&self, executor: E, data: &CreateUserAccount) -> AppResult<UserAccount>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, UserAccount>(
            "INSERT INTO user_accounts \
                 (email, phone, password_hash, salt, tenant_id, enabled, \
                  email_verified, phone_verified) \
             VALUES ($1, $2, $3, $4, $5, TRUE, FALSE, FALSE) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.password_hash)
        .bind(&data.salt)
        .bind(data.tenant_id)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("user_accounts_email_tenant_key") =>
            {
                AppError::email_taken()
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("user_accounts_phone_tenant_key") =>
            {
                AppError::phone_taken()
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Enable or disable an account.
    pub async fn set_enabled(&self, user_id: Uuid, enabled: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE user_accounts SET enabled = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(enabled)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update enabled flag", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Update a user's password hash and salt after a rehash or migration.
    pub async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        salt: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE user_accounts SET password_hash = $2, salt = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(salt)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }
}
