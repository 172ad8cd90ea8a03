//! Authentication cookie configuration.

use serde::{Deserialize, Serialize};

/// Controls the attributes of the `accessToken` / `refreshToken` cookies
/// set by the identity authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie domain. Empty means the browser uses the current domain
    /// (works for localhost); set e.g. `.example.com` for cross-subdomain.
    #[serde(default)]
    pub domain: String,
    /// Use `SameSite=None` instead of `Lax`. Only honored in production,
    /// where the `Secure` flag it requires is set.
    #[serde(default)]
    pub same_site_none: bool,
    /// Deployment environment: `"development"` or `"production"`.
    /// Production turns on the `Secure` flag.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            same_site_none: false,
            environment: default_environment(),
        }
    }
}

impl CookieConfig {
    /// Whether the deployment is production (controls the Secure flag).
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn default_environment() -> String {
    "development".to_string()
}
