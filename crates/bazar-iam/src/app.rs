//! Application builder — wires repositories, auth core, and router, then
//! serves.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use bazar_auth::orchestrator::AuthService;
use bazar_auth::keys::SigningKeyStore;
use bazar_auth::password::PasswordHasher;
use bazar_auth::jwt::TokenMinter;
use bazar_auth::revocation::RevocationIndex;
use bazar_cache::CacheManager;
use bazar_core::config::{AppConfig, FailMode};
use bazar_core::error::AppError;
use bazar_database::repositories::{
    RefreshTokenRepository, RoleGrantRepository, SigningKeyRepository, TenantRepository,
    UserAccountRepository,
};

use crate::cookies::CookieWriter;
use crate::router::build_router;
use crate::state::AppState;

/// Build the application state: cache, repositories, auth core.
///
/// Bootstraps the signing key pool; a failure there is fatal because the
/// authority could never issue tokens.
pub async fn build_state(config: AppConfig, db_pool: PgPool) -> Result<AppState, AppError> {
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    let tenants = TenantRepository::new(db_pool.clone());
    let users = UserAccountRepository::new(db_pool.clone());
    let role_grants = RoleGrantRepository::new(db_pool.clone());
    let refresh_tokens = RefreshTokenRepository::new(db_pool.clone());
    let signing_keys = SigningKeyRepository::new(db_pool.clone());

    let key_store = SigningKeyStore::new(signing_keys, config.keys.clone());
    key_store.ensure_bootstrap(chrono::Utc::now()).await?;

    let hasher = Arc::new(PasswordHasher::new(&config.password)?);
    let minter = TokenMinter::new(&config.auth);

    // The authority's own revocation reads sit on logout-critical paths,
    // so they always fail closed regardless of the gateway policy.
    let revocation = RevocationIndex::new(
        cache.clone(),
        FailMode::Closed,
        std::time::Duration::from_secs(config.auth.refresh_ttl_seconds()),
    );

    let auth_service = AuthService::new(
        db_pool.clone(),
        tenants,
        users,
        role_grants,
        refresh_tokens,
        key_store.clone(),
        minter,
        hasher,
        revocation,
        &config.auth,
    );

    let cookies = CookieWriter::new(config.cookie.clone());

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        cache,
        auth_service: Arc::new(auth_service),
        key_store: Arc::new(key_store),
        cookies: Arc::new(cookies),
    })
}

/// Build the state and serve the authority API until shutdown.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = build_state(config, db_pool).await?;
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Identity authority listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
