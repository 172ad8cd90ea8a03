//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_entity::role::Role;

/// Registration response: the auto-login token pair plus identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Signed access token.
    pub token: String,
    /// Refresh token cleartext; the client stores it, the server keeps
    /// only its hash.
    pub refresh_token: String,
    /// The new user's id.
    pub id: Uuid,
    /// Granted roles.
    pub role: Vec<Role>,
    /// The tenant the user was registered into.
    pub tenant_id: Uuid,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub access_token: String,
    /// Refresh token cleartext.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user's id.
    pub id: Uuid,
    /// Granted roles.
    pub role: Vec<Role>,
    /// The user's tenant.
    pub tenant_id: Uuid,
}

/// Refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New signed access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Simple acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_response_wire_format() {
        let body = RegisterResponse {
            token: "jwt".to_string(),
            refresh_token: "opaque".to_string(),
            id: Uuid::nil(),
            role: vec![Role::Customer],
            tenant_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["token"], "jwt");
        assert_eq!(json["refresh_token"], "opaque");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["role"][0], "CUSTOMER");
        assert_eq!(json["tenant_id"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn login_response_wire_format() {
        let body = LoginResponse {
            access_token: "jwt".to_string(),
            refresh_token: "opaque".to_string(),
            expires_in: 7200,
            id: Uuid::nil(),
            role: vec![Role::Seller],
            tenant_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["access_token"], "jwt");
        assert_eq!(json["expires_in"], 7200);
        assert_eq!(json["role"][0], "SELLER");
    }
}
