//! `AuthPrincipal` extractor — revalidates the credential and injects the
//! request context into handlers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use bazar_core::error::AppError;

use crate::context::RequestContext;
use crate::kernel::TrustKernel;

/// Extracted authenticated context available in handlers.
///
/// Usable from any state type that can lend a [`TrustKernel`] via
/// `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub RequestContext);

impl AuthPrincipal {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthPrincipal {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthPrincipal
where
    TrustKernel: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let kernel = TrustKernel::from_ref(state);
        let context = kernel.authenticate(&parts.headers).await?;
        Ok(AuthPrincipal(context))
    }
}
