//! Gateway process configuration.
//!
//! The gateway shares the platform's configuration sections but not the
//! authority's: it has no database and no password secrets, so it loads
//! its own slimmer root.

use serde::{Deserialize, Serialize};

use bazar_core::config::{CacheConfig, CorsConfig, GatewayConfig, LoggingConfig};
use bazar_core::error::AppError;

/// Root configuration for the gateway binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayAppConfig {
    /// Gateway listener, routing, key-set, and revocation settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Cache settings for the shared revocation store.
    #[serde(default)]
    pub cache: CacheConfig,
    /// CORS, applied ahead of authentication.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayAppConfig {
    /// Load configuration from TOML files and environment variables
    /// prefixed with `BAZAR_GATEWAY__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/gateway").required(false))
            .add_source(config::File::with_name(&format!("config/gateway-{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BAZAR_GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
