//! User account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user account, scoped to one tenant.
///
/// At least one of `email` / `phone` is always present; uniqueness of each
/// is enforced per tenant at the storage level, so the same email may exist
/// once per tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address, if registered with one.
    pub email: Option<String>,
    /// E.164 phone number, if registered with one.
    pub phone: Option<String>,
    /// Argon2id PHC-formatted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Per-user salt (base64). Kept alongside the PHC-embedded salt to
    /// enable algorithm migration.
    #[serde(skip_serializing)]
    pub salt: String,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Whether the account may authenticate.
    pub enabled: bool,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Whether the phone number has been verified.
    pub phone_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// The identifier the user registered with, preferring email.
    /// Used e.g. to name a seller's auto-created tenant.
    pub fn identifier(&self) -> &str {
        self.email
            .as_deref()
            .or(self.phone.as_deref())
            .unwrap_or("")
    }
}

/// Data required to create a new user account.
#[derive(Debug, Clone)]
pub struct CreateUserAccount {
    /// Email address (optional, but one identifier is required).
    pub email: Option<String>,
    /// Phone number (optional, but one identifier is required).
    pub phone: Option<String>,
    /// Pre-hashed password (PHC string).
    pub password_hash: String,
    /// Per-user salt (base64).
    pub salt: String,
    /// Owning tenant.
    pub tenant_id: Uuid,
}
