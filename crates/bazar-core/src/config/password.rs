//! Password hashing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Argon2id parameters plus the process-wide pepper.
///
/// The pepper is a server-side secret mixed into every hash; it is loaded
/// from configuration or environment and never persisted next to the hash.
/// Changing the cost parameters is not a breaking change for stored hashes:
/// verification reads the parameters back from the PHC string, so legacy
/// hashes keep verifying after a parameter bump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Process-wide secret appended to every password before hashing.
    pub pepper: String,
    /// Argon2 iteration count (time cost).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_memory")]
    pub memory_kib: u32,
    /// Argon2 lane count.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
    /// Per-user salt length in bytes. Valid range: 8..=64.
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,
    /// Hash output length in bytes. Valid range: 16..=64.
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
}

impl PasswordConfig {
    /// Validate the parameter bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(8..=64).contains(&self.salt_length) {
            return Err(AppError::configuration(
                "password.salt_length must be between 8 and 64 bytes",
            ));
        }
        if !(16..=64).contains(&self.hash_length) {
            return Err(AppError::configuration(
                "password.hash_length must be between 16 and 64 bytes",
            ));
        }
        Ok(())
    }
}

fn default_iterations() -> u32 {
    5
}

fn default_memory() -> u32 {
    65536
}

fn default_parallelism() -> u32 {
    1
}

fn default_salt_length() -> usize {
    32
}

fn default_hash_length() -> usize {
    32
}
