//! The published public key set (JWKS, RFC 7517).
//!
//! The authority serves this document at `/.well-known/jwks.json`;
//! validators turn each entry back into a verification key. RSA components
//! are base64url without padding over big-endian minimal bytes (the
//! `BigUint` encoding is already free of the sign-padding zero byte).

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::DecodingKey;
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use serde::{Deserialize, Serialize};

use bazar_core::error::AppError;
use bazar_core::result::AppResult;
use bazar_entity::signing_key::SigningKey;

/// A single published verification key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    /// Key type; always `RSA`.
    pub kty: String,
    /// Key identifier matching the `kid` in signed token headers.
    pub kid: String,
    /// Key usage; always `sig`.
    #[serde(rename = "use")]
    pub key_use: String,
    /// Signature algorithm, e.g. `RS256`.
    pub alg: String,
    /// RSA modulus, base64url without padding.
    pub n: String,
    /// RSA public exponent, base64url without padding.
    pub e: String,
}

impl Jwk {
    /// Build a JWK from a persisted signing key's public PEM.
    pub fn from_signing_key(key: &SigningKey) -> AppResult<Self> {
        let public_key = RsaPublicKey::from_public_key_pem(&key.public_key_pem)
            .map_err(|e| AppError::crypto(format!("Failed to parse public key PEM: {e}")))?;

        Ok(Self {
            kty: "RSA".to_string(),
            kid: key.kid.clone(),
            key_use: "sig".to_string(),
            alg: key.algorithm.clone(),
            n: Base64UrlUnpadded::encode_string(&public_key.n().to_bytes_be()),
            e: Base64UrlUnpadded::encode_string(&public_key.e().to_bytes_be()),
        })
    }

    /// Convert this JWK into a verification key.
    pub fn to_decoding_key(&self) -> AppResult<DecodingKey> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
            .map_err(|e| AppError::crypto(format!("Invalid JWK components for {}: {e}", self.kid)))
    }
}

/// The key set document served at the well-known endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct JwksDocument {
    /// The published keys, newest signing key first.
    pub keys: Vec<Jwk>,
}

impl JwksDocument {
    /// Build the document from the currently active signing keys.
    ///
    /// A key that fails to convert is skipped (and logged) rather than
    /// taking the whole endpoint down with it.
    pub fn from_signing_keys(keys: &[SigningKey]) -> Self {
        let keys = keys
            .iter()
            .filter_map(|key| match Jwk::from_signing_key(key) {
                Ok(jwk) => Some(jwk),
                Err(e) => {
                    tracing::error!(kid = %key.kid, error = %e, "Skipping unpublishable key");
                    None
                }
            })
            .collect();
        Self { keys }
    }

    /// Find a key by `kid`.
    pub fn find_by_kid(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}
