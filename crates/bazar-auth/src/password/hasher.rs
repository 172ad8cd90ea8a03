//! Argon2id password hashing with explicit salt + pepper.
//!
//! The KDF input is `password ‖ pepper ‖ salt_b64`: the per-user salt
//! defeats rainbow tables, the process-wide pepper keeps hashes
//! uncrackable even if the database is exfiltrated. The pepper comes from
//! configuration and is never persisted.
//!
//! The stored value is a full PHC-formatted string carrying the Argon2
//! parameters and an internal salt, so verification reads its parameters
//! back from the hash and legacy hashes survive a cost-parameter bump.
//! The explicit per-user salt column stays to enable algorithm migration.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use base64ct::{Base64, Encoding};
use rand::RngCore;
use sha2::{Digest, Sha256};

use bazar_core::config::PasswordConfig;
use bazar_core::error::AppError;
use bazar_core::result::AppResult;

/// Handles password hashing, verification, and deterministic token hashing.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    pepper: String,
    iterations: u32,
    memory_kib: u32,
    parallelism: u32,
    salt_length: usize,
    hash_length: usize,
}

impl PasswordHasher {
    /// Create a hasher from configuration. Fails when the parameter bounds
    /// (salt 8..=64 bytes, hash 16..=64 bytes) are violated.
    pub fn new(config: &PasswordConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            pepper: config.pepper.clone(),
            iterations: config.iterations,
            memory_kib: config.memory_kib,
            parallelism: config.parallelism,
            salt_length: config.salt_length,
            hash_length: config.hash_length,
        })
    }

    /// Generate a cryptographically random per-user salt, base64 encoded.
    pub fn generate_salt(&self) -> String {
        let mut bytes = vec![0u8; self.salt_length];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Base64::encode_string(&bytes)
    }

    /// Hash a password with the per-user salt and the process pepper.
    ///
    /// Returns the full PHC-formatted Argon2id string. The hashing call is
    /// CPU-heavy (hundreds of milliseconds at production cost); callers on
    /// an async runtime must move it to a blocking thread.
    pub fn hash(&self, password: &str, salt_b64: &str) -> AppResult<String> {
        if password.is_empty() {
            return Err(AppError::validation("Password cannot be empty"));
        }
        if salt_b64.is_empty() {
            return Err(AppError::validation("Salt cannot be empty"));
        }

        let combined = self.combine(password, salt_b64);
        let internal_salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()?
            .hash_password(combined.as_bytes(), &internal_salt)
            .map_err(|e| AppError::crypto(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash in constant time.
    ///
    /// Returns `false` on any decoding or parameter mismatch rather than
    /// surfacing the cause. Parameters are taken from the stored hash, so
    /// hashes produced under older cost settings still verify.
    pub fn verify(&self, password: &str, stored_hash: &str, salt_b64: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        let combined = self.combine(password, salt_b64);
        Argon2::default()
            .verify_password(combined.as_bytes(), &parsed)
            .is_ok()
    }

    /// Deterministic one-way hash of a token string: base64(SHA-256(token ‖
    /// pepper)). Stable across processes sharing the pepper, which is what
    /// makes O(1) refresh-token lookup by hash possible.
    pub fn hash_token_deterministic(&self, token: &str) -> AppResult<String> {
        if token.is_empty() {
            return Err(AppError::validation("Token cannot be empty"));
        }
        let mut digest = Sha256::new();
        digest.update(token.as_bytes());
        digest.update(self.pepper.as_bytes());
        Ok(Base64::encode_string(&digest.finalize()))
    }

    fn combine(&self, password: &str, salt_b64: &str) -> String {
        format!("{password}{}{salt_b64}", self.pepper)
    }

    fn argon2(&self) -> AppResult<Argon2<'static>> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.hash_length),
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low-cost parameters so the test suite stays fast; production costs
    // come from configuration.
    fn test_hasher(pepper: &str) -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            pepper: pepper.to_string(),
            iterations: 1,
            memory_kib: 8192,
            parallelism: 1,
            salt_length: 16,
            hash_length: 32,
        })
        .unwrap()
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = test_hasher("pepper-a");
        let salt = hasher.generate_salt();
        let hash = hasher.hash("hunter22X", &salt).unwrap();

        assert!(hasher.verify("hunter22X", &hash, &salt));
        assert!(!hasher.verify("hunter22Y", &hash, &salt));
    }

    #[test]
    fn verify_fails_with_wrong_salt() {
        let hasher = test_hasher("pepper-a");
        let salt = hasher.generate_salt();
        let other_salt = hasher.generate_salt();
        let hash = hasher.hash("hunter22X", &salt).unwrap();

        assert!(!hasher.verify("hunter22X", &hash, &other_salt));
    }

    #[test]
    fn verify_fails_with_wrong_pepper() {
        let hasher = test_hasher("pepper-a");
        let salt = hasher.generate_salt();
        let hash = hasher.hash("hunter22X", &salt).unwrap();

        let other = test_hasher("pepper-b");
        assert!(!other.verify("hunter22X", &hash, &salt));
    }

    #[test]
    fn verify_tolerates_garbage_hash() {
        let hasher = test_hasher("pepper-a");
        assert!(!hasher.verify("pw", "not-a-phc-string", "salt"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let hasher = test_hasher("pepper-a");
        assert!(hasher.hash("", "salt").is_err());
        assert!(hasher.hash("pw", "").is_err());
        assert!(hasher.hash_token_deterministic("").is_err());
    }

    #[test]
    fn salts_are_unique_and_sized() {
        let hasher = test_hasher("pepper-a");
        let a = hasher.generate_salt();
        let b = hasher.generate_salt();
        assert_ne!(a, b);
        assert_eq!(Base64::decode_vec(&a).unwrap().len(), 16);
    }

    #[test]
    fn token_hash_is_deterministic_per_pepper() {
        let hasher = test_hasher("pepper-a");
        let h1 = hasher.hash_token_deterministic("refresh-token").unwrap();
        let h2 = hasher.hash_token_deterministic("refresh-token").unwrap();
        assert_eq!(h1, h2);

        let other = test_hasher("pepper-b");
        assert_ne!(
            h1,
            other.hash_token_deterministic("refresh-token").unwrap()
        );
    }

    #[test]
    fn old_cost_hashes_still_verify_after_parameter_bump() {
        let old = test_hasher("pepper-a");
        let salt = old.generate_salt();
        let hash = old.hash("hunter22X", &salt).unwrap();

        let bumped = PasswordHasher::new(&PasswordConfig {
            pepper: "pepper-a".to_string(),
            iterations: 2,
            memory_kib: 16384,
            parallelism: 1,
            salt_length: 16,
            hash_length: 32,
        })
        .unwrap();

        assert!(bumped.verify("hunter22X", &hash, &salt));
    }
}
