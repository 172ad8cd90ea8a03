//! Gateway server assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use bazar_auth::keyset::RemoteKeySetCache;
use bazar_auth::revocation::RevocationIndex;
use bazar_cache::CacheManager;
use bazar_core::config::FailMode;
use bazar_core::error::AppError;

use crate::config::GatewayAppConfig;
use crate::filter;
use crate::paths::PublicPathMatcher;
use crate::proxy::{Forwarder, RouteTable};
use crate::state::GatewayState;

/// Build the gateway state from configuration.
pub async fn build_state(config: &GatewayAppConfig) -> Result<GatewayState, AppError> {
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    let key_set = Arc::new(RemoteKeySetCache::new(
        config.gateway.jwks_url.clone(),
        Duration::from_secs(config.gateway.jwks_fetch_timeout_seconds),
        Duration::from_secs(config.gateway.jwks_max_stale_seconds),
    )?);
    key_set.spawn_refresh_loop(Duration::from_secs(config.gateway.jwks_refresh_seconds));

    let revocation = RevocationIndex::new(
        cache,
        config.gateway.fail_mode,
        // Epoch entries live as long as any refresh token could.
        Duration::from_secs(30 * 86400),
    );

    Ok(GatewayState {
        public_paths: Arc::new(PublicPathMatcher::new(config.gateway.public_paths.clone())),
        key_set,
        revocation,
        revocation_timeout: Duration::from_millis(config.gateway.revocation_timeout_ms),
        fail_open: config.gateway.fail_mode == FailMode::Open,
        routes: RouteTable::new(config.gateway.routes.clone()),
        forwarder: Forwarder::new(Duration::from_secs(
            config.gateway.upstream_timeout_seconds,
        ))?,
    })
}

/// Build the router: one catch-all route through the validation filter,
/// CORS ahead of it so preflight never hits authentication.
pub fn build_router(state: GatewayState, config: &GatewayAppConfig) -> Router {
    let cors = crate::cors::build_cors_layer(&config.cors);

    Router::new()
        .route("/health", get(health))
        .fallback(filter::handle)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Gateway liveness probe; answered locally, never forwarded.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build everything and serve until shutdown.
pub async fn run(config: GatewayAppConfig) -> Result<(), AppError> {
    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Edge gateway listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
