//! Repository implementations.
//!
//! Write paths that participate in the registration transaction are
//! generic over the sqlx executor, so the orchestrator can run them
//! against either the pool or an open transaction.

pub mod refresh_token;
pub mod role_grant;
pub mod signing_key;
pub mod tenant;
pub mod user_account;

pub use refresh_token::RefreshTokenRepository;
pub use role_grant::RoleGrantRepository;
pub use signing_key::SigningKeyRepository;
pub use tenant::TenantRepository;
pub use user_account::UserAccountRepository;
