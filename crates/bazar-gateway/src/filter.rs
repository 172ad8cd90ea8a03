//! The ingress validation pipeline.
//!
//! Modeled as an explicit state machine over every non-public request:
//! `Extract → VerifySig → CheckRevocation → Decorate → Forward`, each
//! stage with a typed failure. The pipeline never consults the advisory
//! `X-*` headers it emits; principals come from verified claims only.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use bazar_auth::credentials;
use bazar_core::error::ErrorKind;
use bazar_core::types::principal::Principal;

use crate::state::GatewayState;

/// Typed failure of one pipeline stage.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Extract: no credential in header or cookie.
    #[error("Missing or invalid authentication token")]
    MissingCredential,
    /// VerifySig: the token failed verification.
    #[error("{0}")]
    Verification(String),
    /// CheckRevocation: the token has been revoked.
    #[error("Token has been revoked")]
    Revoked,
    /// CheckRevocation: the revocation store could not be consulted and
    /// policy is fail-closed.
    #[error("Authorization backend unavailable")]
    RevocationUnavailable,
    /// Forward: no route matches the request path.
    #[error("No route for path")]
    NoRoute,
    /// Forward: the upstream failed.
    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for FilterError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            FilterError::MissingCredential | FilterError::Verification(_) | FilterError::Revoked => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            FilterError::RevocationUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE")
            }
            FilterError::NoRoute => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            FilterError::Upstream(_) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
        };
        let body = serde_json::json!({
            "code": code,
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// The gateway's catch-all handler: validate, decorate, forward.
pub async fn handle(
    State(state): State<GatewayState>,
    request: Request<Body>,
) -> Result<Response<Body>, FilterError> {
    let path = request.uri().path().to_string();

    if state.public_paths.is_public(&path) {
        debug!(%path, "Public path, skipping validation");
        return forward(&state, request).await;
    }

    // Stage 1: Extract.
    let token = credentials::extract_access_token(request.headers())
        .ok_or(FilterError::MissingCredential)?;

    // Stage 2: VerifySig (cached key set; out-of-band refresh on unknown
    // kid happens inside the cache).
    let claims = state
        .key_set
        .verify(&token, Utc::now())
        .await
        .map_err(|e| match e.kind {
            ErrorKind::UpstreamUnavailable => FilterError::RevocationUnavailable,
            _ => FilterError::Verification(e.message),
        })?;

    // Stage 3: CheckRevocation, bounded by the configured lookup timeout.
    // Dropping the lookup future on cancellation leaves no state behind.
    let revoked = match tokio::time::timeout(
        state.revocation_timeout,
        state.revocation.is_revoked_for(&claims),
    )
    .await
    {
        Ok(Ok(revoked)) => revoked,
        Ok(Err(e)) if e.kind == ErrorKind::UpstreamUnavailable => {
            return Err(FilterError::RevocationUnavailable);
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Revocation lookup failed");
            return Err(FilterError::RevocationUnavailable);
        }
        Err(_) => {
            warn!(path = %path, "Revocation lookup timed out");
            if state.fail_open {
                false
            } else {
                return Err(FilterError::RevocationUnavailable);
            }
        }
    };
    if revoked {
        return Err(FilterError::Revoked);
    }

    // Stage 4: Decorate. The original token is forwarded verbatim so
    // downstream kernels can revalidate; the X-* headers are advisory.
    let principal = claims.principal();
    let mut request = request;
    decorate(&mut request, &token, &principal);

    debug!(
        user_id = %principal.user_id,
        tenant_id = %principal.tenant_id,
        %path,
        "Token validated, forwarding"
    );

    // Stage 5: Forward.
    forward(&state, request).await
}

/// Set the forwarded Authorization header and the advisory context
/// headers.
fn decorate(request: &mut Request<Body>, token: &str, principal: &Principal) {
    let headers = request.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
        headers.insert(http::header::AUTHORIZATION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&principal.user_id.to_string()) {
        headers.insert("x-user-id", value);
    }
    if let Ok(value) = HeaderValue::from_str(&principal.tenant_id.to_string()) {
        headers.insert("x-tenant-id", value);
    }
    if let Ok(value) = HeaderValue::from_str(&principal.roles_header()) {
        headers.insert("x-roles", value);
    }
}

/// Route and forward the request to its upstream.
async fn forward(state: &GatewayState, request: Request<Body>) -> Result<Response<Body>, FilterError> {
    let path = request.uri().path();
    let upstream = state
        .routes
        .upstream_for(path)
        .ok_or(FilterError::NoRoute)?
        .to_string();

    let (parts, body) = request.into_parts();
    state
        .forwarder
        .forward(&upstream, parts.method, &parts.uri, parts.headers, body)
        .await
}
