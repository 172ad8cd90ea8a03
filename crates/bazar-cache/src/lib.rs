//! # bazar-cache
//!
//! Cache backends for the Bazar platform. The only write-hot consumer is
//! the revocation index (blacklisted token ids and per-user revocation
//! epochs), which needs native TTL and O(1) existence checks.
//!
//! Two providers implement [`bazar_core::traits::CacheProvider`]:
//! Redis for production (distributed, shared between the authority, the
//! gateway, and every trust kernel) and an in-memory store for tests and
//! single-node development.

pub mod keys;
pub mod memory;
pub mod provider;
pub mod redis;

pub use provider::CacheManager;
