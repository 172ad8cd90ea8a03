//! Independent credential revalidation for backend services.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use http::HeaderMap;
use tracing::debug;
use uuid::Uuid;

use bazar_auth::credentials;
use bazar_auth::keyset::RemoteKeySetCache;
use bazar_auth::revocation::RevocationIndex;
use bazar_core::error::AppError;
use bazar_core::result::AppResult;

use crate::context::RequestContext;

/// Validates inbound credentials against the published key set and the
/// shared revocation index, exactly as the gateway does.
///
/// Constructed once at service start and injected (no globals). The
/// principal always comes from the verified token claims; the advisory
/// `X-*` headers the gateway adds are consulted for logging only.
#[derive(Debug, Clone)]
pub struct TrustKernel {
    key_set: Arc<RemoteKeySetCache>,
    revocation: RevocationIndex,
    revocation_timeout: Duration,
}

impl TrustKernel {
    /// Create a kernel over the shared key-set cache and revocation
    /// index.
    pub fn new(
        key_set: Arc<RemoteKeySetCache>,
        revocation: RevocationIndex,
        revocation_timeout: Duration,
    ) -> Self {
        Self {
            key_set,
            revocation,
            revocation_timeout,
        }
    }

    /// Authenticate a request from its headers.
    ///
    /// Extraction follows the platform rule (Authorization header first,
    /// `accessToken` cookie second); the token is then verified and
    /// checked against the revocation index.
    pub async fn authenticate(&self, headers: &HeaderMap) -> AppResult<RequestContext> {
        let token = credentials::extract_access_token(headers)
            .ok_or_else(|| AppError::unauthorized("Missing authentication token"))?;

        let claims = self
            .key_set
            .verify(&token, Utc::now())
            .await
            .map_err(|e| match e.kind {
                bazar_core::error::ErrorKind::UpstreamUnavailable => e,
                _ => AppError::unauthorized(e.message),
            })?;

        let revoked = tokio::time::timeout(
            self.revocation_timeout,
            self.revocation.is_revoked_for(&claims),
        )
        .await
        .map_err(|_| AppError::upstream_unavailable("Revocation lookup timed out"))??;

        if revoked {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        let principal = claims.principal();

        // Advisory headers are never trusted; a mismatch is only worth a
        // log line for the ingress operators.
        if let Some(advisory) = headers.get("x-user-id").and_then(|v| v.to_str().ok()) {
            if advisory != principal.user_id.to_string() {
                debug!(
                    advisory_user_id = %advisory,
                    verified_user_id = %principal.user_id,
                    "Advisory X-User-Id disagrees with verified claims"
                );
            }
        }

        let trace_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(RequestContext::new(principal, trace_id))
    }
}
