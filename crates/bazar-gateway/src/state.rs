//! Gateway state shared across the validation pipeline.

use std::sync::Arc;
use std::time::Duration;

use bazar_auth::keyset::RemoteKeySetCache;
use bazar_auth::revocation::RevocationIndex;

use crate::paths::PublicPathMatcher;
use crate::proxy::{Forwarder, RouteTable};

/// All the gateway's shared dependencies, constructed once at startup and
/// injected into the handler via axum state.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Public path matcher.
    pub public_paths: Arc<PublicPathMatcher>,
    /// Cached view of the authority's published keys.
    pub key_set: Arc<RemoteKeySetCache>,
    /// Shared revocation index (same store the authority writes).
    pub revocation: RevocationIndex,
    /// Timeout for a single revocation lookup.
    pub revocation_timeout: Duration,
    /// Whether a revocation-store timeout fails open (request proceeds).
    pub fail_open: bool,
    /// Upstream routing table.
    pub routes: RouteTable,
    /// Request forwarder.
    pub forwarder: Forwarder,
}
