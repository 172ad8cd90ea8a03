//! HTTP handlers for the authority API.

pub mod auth;
pub mod health;
pub mod jwks;
