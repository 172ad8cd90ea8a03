//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use bazar_core::traits::cache::CacheProvider;

use crate::state::AppState;

/// GET /health
///
/// Reports connectivity to the database and the revocation store.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db_pool)
        .await
        .is_ok();
    let cache = state.cache.health_check().await.unwrap_or(false);

    let status = if database && cache { "ok" } else { "degraded" };
    Json(json!({
        "status": status,
        "database": database,
        "cache": cache,
    }))
}
