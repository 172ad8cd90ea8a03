//! The public key set endpoint.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use bazar_auth::jwks::JwksDocument;
use bazar_core::error::AppError;

use crate::state::AppState;

/// GET /.well-known/jwks.json
///
/// Unauthenticated. Publishes every currently active verification key so
/// the gateway and the per-service trust kernels can validate tokens
/// without talking to the authority on the request path.
pub async fn jwks(State(state): State<AppState>) -> Result<Json<JwksDocument>, AppError> {
    let keys = state.key_store.active_keys_at(Utc::now()).await?;
    Ok(Json(JwksDocument::from_signing_keys(&keys)))
}
