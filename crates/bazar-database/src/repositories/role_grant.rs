//! Role grant repository implementation.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_entity::role::Role;

/// Repository for role grants. `(user_id, role)` is unique; a user always
/// holds at least one grant (created with the account).
#[derive(Debug, Clone)]
pub struct RoleGrantRepository {
    pool: PgPool,
}

impl RoleGrantRepository {
    /// Create a new role grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grant a role to a user. Idempotent within the unique constraint.
    pub async fn create<'e, E>(&self, executor: E, user_id: Uuid, role: Role) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO role_grants (user_id, role) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT role_grants_user_role_key DO NOTHING",
        )
        .bind(user_id)
        .bind(role)
        .execute(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create role grant", e))?;
        Ok(())
    }

    /// Load all roles granted to a user, oldest grant first.
    pub async fn find_roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        sqlx::query_scalar::<_, Role>(
            "SELECT role FROM role_grants WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load role grants", e))
    }
}
