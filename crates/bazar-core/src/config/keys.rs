//! Signing key lifecycle configuration.

use serde::{Deserialize, Serialize};

/// RSA signing key generation and expiry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Days until a newly created signing key expires. Rotation is
    /// overlap-based: the old key keeps verifying until this passes.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
    /// RSA modulus size in bits for generated keys.
    #[serde(default = "default_rsa_bits")]
    pub rsa_bits: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            expiry_days: default_expiry_days(),
            rsa_bits: default_rsa_bits(),
        }
    }
}

fn default_expiry_days() -> i64 {
    90
}

fn default_rsa_bits() -> usize {
    2048
}
