//! # bazar-entity
//!
//! Persistent domain models for the Bazar identity platform: tenants,
//! user accounts, role grants, signing keys, and refresh tokens.

pub mod refresh_token;
pub mod role;
pub mod signing_key;
pub mod tenant;
pub mod user;
pub mod validation;

pub use refresh_token::RefreshToken;
pub use role::Role;
pub use signing_key::SigningKey;
pub use tenant::{Tenant, TenantStatus};
pub use user::UserAccount;
