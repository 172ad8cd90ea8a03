//! Application state shared across all authority handlers.

use std::sync::Arc;

use sqlx::PgPool;

use bazar_auth::AuthService;
use bazar_auth::keys::SigningKeyStore;
use bazar_cache::CacheManager;
use bazar_core::config::AppConfig;

use crate::cookies::CookieWriter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory) backing the revocation index.
    pub cache: Arc<CacheManager>,
    /// The auth flows.
    pub auth_service: Arc<AuthService>,
    /// Signing key pool, for the JWKS endpoint.
    pub key_store: Arc<SigningKeyStore>,
    /// Auth cookie writer.
    pub cookies: Arc<CookieWriter>,
}
