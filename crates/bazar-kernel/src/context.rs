//! Explicit request context threaded through handlers.
//!
//! No ambient/thread-local storage: the context is constructed by the
//! kernel at the top of each request and passed down explicitly.

use std::time::Instant;

use uuid::Uuid;

use bazar_core::types::principal::Principal;

/// The per-request context a backend handler receives.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated principal from the verified token claims.
    pub principal: Principal,
    /// Correlation id for logs, taken from `X-Request-Id` when present.
    pub trace_id: Uuid,
    /// Optional processing deadline for downstream calls.
    pub deadline: Option<Instant>,
}

impl RequestContext {
    /// Create a context for a verified principal.
    pub fn new(principal: Principal, trace_id: Uuid) -> Self {
        Self {
            principal,
            trace_id,
            deadline: None,
        }
    }

    /// Attach a processing deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The authenticated user id.
    pub fn user_id(&self) -> Uuid {
        self.principal.user_id
    }

    /// The principal's tenant.
    pub fn tenant_id(&self) -> Uuid {
        self.principal.tenant_id
    }
}
