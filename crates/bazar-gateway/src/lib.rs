//! # bazar-gateway
//!
//! The single authenticated ingress of the Bazar platform. Every
//! non-public request passes an explicit validation pipeline —
//! extract → verify signature → check revocation → decorate → forward —
//! before reaching a backend service.

pub mod config;
pub mod cors;
pub mod filter;
pub mod paths;
pub mod proxy;
pub mod server;
pub mod state;

pub use paths::PublicPathMatcher;
