//! Tenant repository implementation.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_entity::tenant::{Tenant, TenantStatus};

/// Repository for tenant lookup and creation.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new tenant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tenant by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find tenant by id", e)
            })
    }

    /// Create a new tenant. Takes an executor so seller registration can
    /// create the tenant inside the registration transaction.
    pub async fn create<'e, E>(&self, executor: E, name: &str) -> AppResult<Tenant>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name, status) VALUES ($1, 'ACTIVE') RETURNING *",
        )
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create tenant", e))
    }

    /// Transition a tenant's status. Tenants are never deleted.
    pub async fn set_status(&self, id: Uuid, status: TenantStatus) -> AppResult<Tenant> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update tenant", e))?
        .ok_or_else(|| AppError::not_found(format!("Tenant {id} not found")))
    }
}
