//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod cache;
pub mod cookie;
pub mod database;
pub mod gateway;
pub mod keys;
pub mod logging;
pub mod password;
pub mod server;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::cookie::CookieConfig;
pub use self::database::DatabaseConfig;
pub use self::gateway::{FailMode, GatewayConfig, RouteConfig};
pub use self::keys::KeyConfig;
pub use self::logging::LoggingConfig;
pub use self::password::PasswordConfig;
pub use self::server::{CorsConfig, ServerConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings for the identity authority.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Cache / revocation store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token issuance settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Password hashing settings. The pepper is required.
    pub password: PasswordConfig,
    /// Signing key lifecycle settings.
    #[serde(default)]
    pub keys: KeyConfig,
    /// Authentication cookie settings.
    #[serde(default)]
    pub cookie: CookieConfig,
    /// Edge gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `BAZAR__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BAZAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field invariants that serde defaults cannot express.
    ///
    /// Called at startup; a failure here terminates the process.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.password.pepper.trim().is_empty() {
            return Err(AppError::configuration(
                "password.pepper must be set to a non-empty secret",
            ));
        }
        self.password.validate()?;
        Ok(())
    }
}
