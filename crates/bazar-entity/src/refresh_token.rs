//! Refresh token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted refresh token record.
///
/// Only the deterministic hash of the opaque token string is stored; the
/// cleartext is returned to the client exactly once at issuance. Lookup is
/// by hash. Records are mutated only to set `revoked = true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique record identifier.
    pub id: Uuid,
    /// The user this token was issued to.
    pub user_id: Uuid,
    /// Deterministic one-way hash of the opaque token string.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Expiry instant; the token is unusable afterwards.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked by logout.
    pub revoked: bool,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Whether the token is usable at instant `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(revoked: bool, expires_in: Duration) -> RefreshToken {
        let now = Utc::now();
        RefreshToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "hash".to_string(),
            expires_at: now + expires_in,
            revoked,
            created_at: now,
        }
    }

    #[test]
    fn usable_when_live() {
        assert!(token(false, Duration::days(1)).is_usable_at(Utc::now()));
    }

    #[test]
    fn unusable_when_revoked_or_expired() {
        assert!(!token(true, Duration::days(1)).is_usable_at(Utc::now()));
        assert!(!token(false, Duration::seconds(-1)).is_usable_at(Utc::now()));
    }
}
