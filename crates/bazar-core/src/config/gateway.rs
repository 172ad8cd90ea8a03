//! Edge gateway configuration.

use serde::{Deserialize, Serialize};

/// Behavior when the revocation store is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailMode {
    /// Treat an unreachable store as "not revoked" and log the divergence.
    Open,
    /// Reject the request with 503 when the store cannot be consulted.
    Closed,
}

/// A single routing rule: requests whose path starts with `prefix` are
/// forwarded to `upstream`. Longest prefix wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Path prefix, e.g. `/api/v1/profile`.
    pub prefix: String,
    /// Upstream base URL, e.g. `http://profile:8080`.
    pub upstream: String,
}

/// Edge gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address for the gateway listener.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port for the gateway listener.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Ant-style glob patterns for paths that skip authentication.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
    /// Routing table, matched by longest prefix.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    /// URL of the identity authority's JWKS endpoint.
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    /// Interval between background key-set refreshes, in seconds.
    #[serde(default = "default_jwks_refresh")]
    pub jwks_refresh_seconds: u64,
    /// Maximum age of a stale key-set snapshot before validation fails.
    #[serde(default = "default_jwks_max_stale")]
    pub jwks_max_stale_seconds: u64,
    /// Timeout for a single JWKS fetch, in seconds.
    #[serde(default = "default_jwks_fetch_timeout")]
    pub jwks_fetch_timeout_seconds: u64,
    /// Timeout for a single revocation store lookup, in milliseconds.
    #[serde(default = "default_revocation_timeout")]
    pub revocation_timeout_ms: u64,
    /// Policy when the revocation store is unreachable on a read path.
    #[serde(default = "default_fail_mode")]
    pub fail_mode: FailMode,
    /// Timeout for forwarding a request to an upstream, in seconds.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_paths: default_public_paths(),
            routes: Vec::new(),
            jwks_url: default_jwks_url(),
            jwks_refresh_seconds: default_jwks_refresh(),
            jwks_max_stale_seconds: default_jwks_max_stale(),
            jwks_fetch_timeout_seconds: default_jwks_fetch_timeout(),
            revocation_timeout_ms: default_revocation_timeout(),
            fail_mode: default_fail_mode(),
            upstream_timeout_seconds: default_upstream_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Endpoints reachable without a credential. Logout endpoints are
/// deliberately absent: logging out requires a valid token.
fn default_public_paths() -> Vec<String> {
    vec![
        "/api/v1/auth/register".to_string(),
        "/api/v1/auth/login".to_string(),
        "/api/v1/auth/refresh".to_string(),
        "/.well-known/**".to_string(),
        "/health".to_string(),
        "/docs/**".to_string(),
    ]
}

fn default_jwks_url() -> String {
    "http://localhost:8081/.well-known/jwks.json".to_string()
}

fn default_jwks_refresh() -> u64 {
    300
}

fn default_jwks_max_stale() -> u64 {
    86400
}

fn default_jwks_fetch_timeout() -> u64 {
    5
}

fn default_revocation_timeout() -> u64 {
    50
}

fn default_fail_mode() -> FailMode {
    FailMode::Closed
}

fn default_upstream_timeout() -> u64 {
    30
}
