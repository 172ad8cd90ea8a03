//! Token verification against a key set.
//!
//! Verification is pure with respect to time: the caller supplies `now`,
//! so the authority, the gateway, and tests all validate expiry against an
//! explicit clock instead of a hidden one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use thiserror::Error;

use bazar_core::error::AppError;
use bazar_core::result::AppResult;
use bazar_entity::signing_key::SigningKey;

use crate::jwks::JwksDocument;

use super::claims::Claims;

/// Clock skew tolerance for expiry checks, in seconds.
const LEEWAY_SECONDS: i64 = 5;

/// Typed verification failures. Each maps to a 401 at the HTTP boundary,
/// but validators branch on the variants (`UnknownKid` triggers an
/// out-of-band key-set refresh).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a well-formed JWT or its claims do not parse.
    #[error("Malformed token")]
    Malformed,
    /// The token's expiry has passed.
    #[error("Token has expired")]
    Expired,
    /// The token's `kid` is not in the verification key set.
    #[error("Unknown signing key: {0}")]
    UnknownKid(String),
    /// The signature does not verify against the selected key.
    #[error("Invalid token signature")]
    BadSignature,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::unauthorized(err.to_string())
    }
}

/// A set of public verification keys indexed by `kid`.
///
/// The authority builds it from its own key pool; gateway and trust
/// kernels build it from the fetched JWKS document. Either way the same
/// verifier runs against it.
#[derive(Clone, Default)]
pub struct VerificationKeySet {
    keys: HashMap<String, DecodingKey>,
}

impl std::fmt::Debug for VerificationKeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKeySet")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl VerificationKeySet {
    /// Build a key set from persisted signing keys (authority side).
    pub fn from_signing_keys(keys: &[SigningKey]) -> AppResult<Self> {
        let mut map = HashMap::with_capacity(keys.len());
        for key in keys {
            let decoding = DecodingKey::from_rsa_pem(key.public_key_pem.as_bytes())
                .map_err(|e| AppError::crypto(format!("Failed to parse public key: {e}")))?;
            map.insert(key.kid.clone(), decoding);
        }
        Ok(Self { keys: map })
    }

    /// Build a key set from a published JWKS document (validator side).
    pub fn from_jwks(document: &JwksDocument) -> AppResult<Self> {
        let mut map = HashMap::with_capacity(document.keys.len());
        for jwk in &document.keys {
            map.insert(jwk.kid.clone(), jwk.to_decoding_key()?);
        }
        Ok(Self { keys: map })
    }

    /// Whether the set contains the given key id.
    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }
}

/// Verifies access tokens and extracts claims.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier;

impl TokenVerifier {
    /// Create a verifier.
    pub fn new() -> Self {
        Self
    }

    /// Verify `token` against `key_set` at instant `now`.
    ///
    /// Checks, in order: well-formedness, `kid` presence in the set,
    /// signature, then expiry (`exp > now`, with a small leeway).
    pub fn verify(
        &self,
        token: &str,
        key_set: &VerificationKeySet,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;
        let kid = header.kid.ok_or(TokenError::Malformed)?;

        let key = key_set
            .get(&kid)
            .ok_or_else(|| TokenError::UnknownKid(kid.clone()))?;

        // Expiry is checked against the supplied clock below, not the
        // library's wall clock.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
            jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
            _ => TokenError::Malformed,
        })?;

        if data.claims.exp + LEEWAY_SECONDS <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Parse header and claims without verifying the signature.
    ///
    /// Used by the authority where verification is intrinsic (e.g. pulling
    /// the `sub` out of an accompanying, possibly expired access token
    /// during refresh). Fails with `Malformed` on garbage input.
    pub fn parse_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Malformed)
    }

    /// Extract the `jti` without signature verification.
    pub fn extract_jti(&self, token: &str) -> Result<uuid::Uuid, TokenError> {
        Ok(self.parse_unverified(token)?.jti)
    }

    /// Extract the `sub` without signature verification.
    pub fn extract_sub(&self, token: &str) -> Result<uuid::Uuid, TokenError> {
        Ok(self.parse_unverified(token)?.sub)
    }

    /// Remaining lifetime of the token at `now`, in seconds (0 if expired).
    pub fn remaining_ttl(&self, token: &str, now: DateTime<Utc>) -> Result<u64, TokenError> {
        Ok(self.parse_unverified(token)?.remaining_ttl_seconds(now))
    }
}
