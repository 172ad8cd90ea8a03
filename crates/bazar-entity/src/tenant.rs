//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The well-known id of the default marketplace tenant, seeded at
/// bootstrap. Customers registering without an explicit tenant land here.
pub const DEFAULT_TENANT_ID: Uuid = Uuid::nil();

/// Tenant lifecycle status. Tenants are never deleted; only the status
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tenant_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TenantStatus {
    /// Tenant is operational.
    Active,
    /// Tenant is suspended; its users cannot authenticate.
    Inactive,
}

/// An administrative isolation boundary. Cross-tenant access is
/// indistinguishable from not-found everywhere downstream.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: Uuid,
    /// Display name; seller tenants are named after the registrant.
    pub name: String,
    /// Lifecycle status.
    pub status: TenantStatus,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Whether this is the seeded default marketplace tenant.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_TENANT_ID
    }
}
