//! Token creation: RS256-signed access tokens and opaque refresh tokens.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use rand::RngCore;
use uuid::Uuid;

use bazar_core::config::AuthConfig;
use bazar_core::error::AppError;
use bazar_core::result::AppResult;
use bazar_entity::role::Role;
use bazar_entity::signing_key::SigningKey;
use bazar_entity::user::UserAccount;

use super::claims::Claims;

/// Bytes of entropy in an opaque refresh token (256 bits).
const REFRESH_TOKEN_BYTES: usize = 32;

/// A freshly minted access token with its claims.
#[derive(Debug, Clone)]
pub struct MintedToken {
    /// The serialized, signed token.
    pub token: String,
    /// The claims that were signed into it.
    pub claims: Claims,
}

/// Creates signed access tokens and opaque refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenMinter {
    access_ttl_seconds: i64,
    issuer: String,
}

impl TokenMinter {
    /// Create a minter from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_ttl_seconds: config.access_ttl_seconds as i64,
            issuer: config.issuer.clone(),
        }
    }

    /// The configured access token TTL in seconds (`expires_in` on the wire).
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    /// Mint an RS256 access token for `user`, signed with `key`.
    ///
    /// The key's `kid` goes into the JOSE header so validators can select
    /// the matching public key across rotations. Each call draws a fresh
    /// `jti`, the handle later used for revocation.
    pub fn mint_access(
        &self,
        key: &SigningKey,
        user: &UserAccount,
        roles: &[Role],
        now: DateTime<Utc>,
    ) -> AppResult<MintedToken> {
        let claims = Claims {
            sub: user.id,
            tenant_id: user.tenant_id,
            roles: roles.to_vec(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_ttl_seconds)).timestamp(),
            iss: self.issuer.clone(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(key.kid.clone());

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key_pem.as_bytes())
            .map_err(|e| AppError::crypto(format!("Failed to load signing key: {e}")))?;

        let token = encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::crypto(format!("Failed to sign access token: {e}")))?;

        Ok(MintedToken { token, claims })
    }

    /// Mint an opaque refresh token: base64url of 256 random bits.
    ///
    /// The caller persists only its deterministic hash; the cleartext goes
    /// to the client exactly once.
    pub fn mint_refresh() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Base64UrlUnpadded::encode_string(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_tokens_are_unique_and_high_entropy() {
        let a = TokenMinter::mint_refresh();
        let b = TokenMinter::mint_refresh();
        assert_ne!(a, b);
        assert_eq!(Base64UrlUnpadded::decode_vec(&a).unwrap().len(), 32);
    }
}
