//! Signing key entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted RSA signing key pair.
///
/// The private PEM never leaves the identity authority process; validators
/// only ever see the public components through the JWKS endpoint. A key is
/// active while `expires_at` is null or in the future, and multiple keys
/// may be active at once during a rotation overlap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SigningKey {
    /// Key identifier, embedded as `kid` in every signed token's header.
    pub kid: String,
    /// SPKI public key, PEM encoded.
    pub public_key_pem: String,
    /// PKCS#8 private key, PEM encoded. Never serialized outward.
    #[serde(skip_serializing)]
    pub private_key_pem: String,
    /// Signature algorithm tag, e.g. `RS256`.
    pub algorithm: String,
    /// When the key was created. The most recent active key signs.
    pub created_at: DateTime<Utc>,
    /// When the key stops verifying; null means no scheduled expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SigningKey {
    /// Whether the key is active (usable for verification) at instant `t`.
    pub fn is_active_at(&self, t: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at > t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn key(expires_at: Option<DateTime<Utc>>) -> SigningKey {
        SigningKey {
            kid: "key-1".to_string(),
            public_key_pem: String::new(),
            private_key_pem: String::new(),
            algorithm: "RS256".to_string(),
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn active_without_expiry() {
        assert!(key(None).is_active_at(Utc::now()));
    }

    #[test]
    fn active_until_expiry() {
        let now = Utc::now();
        assert!(key(Some(now + Duration::days(1))).is_active_at(now));
        assert!(!key(Some(now - Duration::seconds(1))).is_active_at(now));
    }
}
