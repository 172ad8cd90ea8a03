//! Token issuance configuration.

use serde::{Deserialize, Serialize};

/// Access and refresh token lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access token TTL in seconds. Short-lived; refresh handles UX.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: u64,
    /// Refresh token TTL in days. Full session lifetime.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// The `iss` claim stamped into every access token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            issuer: default_issuer(),
        }
    }
}

impl AuthConfig {
    /// Refresh token TTL expressed in seconds.
    pub fn refresh_ttl_seconds(&self) -> u64 {
        self.refresh_ttl_days * 24 * 3600
    }
}

fn default_access_ttl() -> u64 {
    2 * 3600
}

fn default_refresh_ttl() -> u64 {
    30
}

fn default_issuer() -> String {
    "bazar-identity".to_string()
}
