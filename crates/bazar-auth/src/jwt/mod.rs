//! Access token minting, claims, and verification.

pub mod claims;
pub mod minter;
pub mod verifier;

pub use claims::Claims;
pub use minter::{MintedToken, TokenMinter};
pub use verifier::{TokenError, TokenVerifier, VerificationKeySet};
