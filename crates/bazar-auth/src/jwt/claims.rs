//! Access token claims payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_core::types::principal::Principal;
use bazar_entity::role::Role;

/// Claims payload embedded in every access token.
///
/// The `jti` is the revocation handle: unique per issuance, it keys the
/// blacklist entry written at logout. `iat` is compared against the
/// per-user revocation epoch by validators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user account id.
    pub sub: Uuid,
    /// The tenant the user belongs to.
    pub tenant_id: Uuid,
    /// Roles granted at issuance.
    pub roles: Vec<Role>,
    /// Email, when the account has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone, when the account has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Unique token id, fresh per issuance.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    /// Returns the user id from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Checks whether this token is expired at instant `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns the remaining TTL in seconds at instant `now` (0 if expired).
    pub fn remaining_ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.exp - now.timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }

    /// The authenticated principal these claims establish.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.sub,
            tenant_id: self.tenant_id,
            roles: self.roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(now: DateTime<Utc>, ttl_seconds: i64) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            roles: vec![Role::Customer],
            email: Some("a@b.com".to_string()),
            phone: None,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: "bazar-identity".to_string(),
        }
    }

    #[test]
    fn remaining_ttl_counts_down() {
        let now = Utc::now();
        let c = claims(now, 7200);
        assert_eq!(c.remaining_ttl_seconds(now), 7200);
        assert_eq!(c.remaining_ttl_seconds(now + Duration::seconds(7100)), 100);
        assert_eq!(c.remaining_ttl_seconds(now + Duration::seconds(7201)), 0);
    }

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        let c = claims(now, 60);
        assert!(!c.is_expired_at(now));
        assert!(c.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn principal_carries_uppercase_roles() {
        let now = Utc::now();
        let p = claims(now, 60).principal();
        assert_eq!(p.roles, vec!["CUSTOMER".to_string()]);
    }
}
