//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bazar_entity::role::Role;

/// Registration request body. Either `email` or `phone` must be present;
/// the orchestrator enforces that cross-field rule along with identifier
/// formats.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email identifier.
    pub email: Option<String>,
    /// Phone identifier (E.164).
    pub phone: Option<String>,
    /// Cleartext password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Explicit tenant to register into, when provisioning staff roles.
    pub tenant_id: Option<Uuid>,
    /// The role granted at registration.
    pub role: Role,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email identifier.
    pub email: Option<String>,
    /// Phone identifier.
    pub phone: Option<String>,
    /// Cleartext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The opaque refresh token cleartext.
    pub refresh_token: String,
}

/// Logout request body. The refresh token may instead arrive in the
/// `refreshToken` cookie; the body takes precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// The opaque refresh token cleartext.
    pub refresh_token: Option<String>,
}
