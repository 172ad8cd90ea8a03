//! # bazar-core
//!
//! Core crate for the Bazar marketplace identity platform. Contains
//! configuration schemas, the unified error system, the authenticated
//! principal type, and the cache provider trait.
//!
//! This crate has **no** internal dependencies on other Bazar crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::principal::Principal;
