//! # bazar-kernel
//!
//! The per-service trust kernel. Every backend service embeds this crate
//! to revalidate inbound credentials independently of the gateway
//! (defense in depth: a compromised ingress, or an attacker reaching the
//! service directly, still fails here) and to enforce per-resource
//! authorization with absolute tenant isolation.

pub mod authorize;
pub mod context;
pub mod extractor;
pub mod kernel;

pub use authorize::{Access, ResourceIdentity, authorize, require};
pub use context::RequestContext;
pub use extractor::AuthPrincipal;
pub use kernel::TrustKernel;
