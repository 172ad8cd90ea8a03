//! # bazar-database
//!
//! PostgreSQL persistence: connection pool, migrations, and repositories
//! for tenants, user accounts, role grants, signing keys, and refresh
//! tokens.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
