//! # bazar-auth
//!
//! The auth core of the Bazar identity platform.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing with per-user salt and
//!   process-wide pepper; deterministic refresh-token hashing
//! - `keys` — RSA signing key generation and lifecycle
//! - `jwt` — access token minting, claims, and verification
//! - `jwks` — the published public key set document
//! - `keyset` — the validators' cached view of the published keys
//! - `revocation` — TTL-keyed token blacklist and per-user revocation epochs
//! - `credentials` — hybrid header/cookie credential extraction
//! - `orchestrator` — register / login / refresh / logout / logout-all flows

pub mod credentials;
pub mod jwks;
pub mod jwt;
pub mod keys;
pub mod keyset;
pub mod orchestrator;
pub mod password;
pub mod revocation;

pub use jwks::{Jwk, JwksDocument};
pub use jwt::{Claims, TokenError, TokenMinter, TokenVerifier, VerificationKeySet};
pub use keys::SigningKeyStore;
pub use keyset::RemoteKeySetCache;
pub use orchestrator::AuthService;
pub use password::PasswordHasher;
pub use revocation::RevocationIndex;
