//! Unified application error types for the Bazar identity platform.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] set mirrors what
//! clients are allowed to observe: auth precondition failures collapse into
//! `BadCredentials` so that registration/login responses never disclose
//! whether an account exists.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use uuid::Uuid;

use crate::types::response::ApiErrorResponse;

/// Top-level error kind categorization used across the entire platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// An authentication precondition failed (unknown identifier, disabled
    /// account, wrong password, bad or revoked refresh token).
    BadCredentials,
    /// Email already registered within the tenant.
    EmailTaken,
    /// Phone already registered within the tenant.
    PhoneTaken,
    /// Unknown tenant id, or a tenant id is required for the role.
    InvalidTenant,
    /// Request shape or field format is wrong.
    Validation,
    /// Credential missing or invalid at the gateway or trust kernel.
    Unauthorized,
    /// Credential valid but not permitted for the resource.
    Forbidden,
    /// Resource missing, or a cross-tenant access masked as missing.
    NotFound,
    /// Duplicate entry or concurrent modification.
    Conflict,
    /// Revocation store or key set unreachable under fail-closed policy.
    UpstreamUnavailable,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A cryptographic operation failed (key parsing, signing, hashing).
    Crypto,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadCredentials => write!(f, "BAD_CREDENTIALS"),
            Self::EmailTaken => write!(f, "EMAIL_TAKEN"),
            Self::PhoneTaken => write!(f, "PHONE_TAKEN"),
            Self::InvalidTenant => write!(f, "INVALID_TENANT"),
            Self::Validation => write!(f, "VALIDATION_ERROR"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::UpstreamUnavailable => write!(f, "UPSTREAM_UNAVAILABLE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Crypto => write!(f, "CRYPTO"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Bazar.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional list of offending fields (validation errors only).
    pub fields: Option<Vec<String>>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a bad-credentials error.
    pub fn bad_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadCredentials, message)
    }

    /// Create an email-taken error.
    pub fn email_taken() -> Self {
        Self::new(ErrorKind::EmailTaken, "Email already registered")
    }

    /// Create a phone-taken error.
    pub fn phone_taken() -> Self {
        Self::new(ErrorKind::PhoneTaken, "Phone already registered")
    }

    /// Create an invalid-tenant error.
    pub fn invalid_tenant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTenant, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a validation error naming the offending fields.
    pub fn validation_fields(message: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            fields: Some(fields),
            source: None,
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an upstream-unavailable error.
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a crypto error.
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Crypto, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is surfaced to clients as-is (domain error) or
    /// converted to an opaque 500 with a correlation id.
    pub fn is_client_facing(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::Database
                | ErrorKind::Cache
                | ErrorKind::Configuration
                | ErrorKind::Crypto
                | ErrorKind::Internal
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::BadCredentials | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::EmailTaken | ErrorKind::PhoneTaken | ErrorKind::Conflict => {
                StatusCode::CONFLICT
            }
            ErrorKind::InvalidTenant | ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Database
            | ErrorKind::Cache
            | ErrorKind::Configuration
            | ErrorKind::Crypto
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = if self.is_client_facing() {
            ApiErrorResponse {
                code: self.kind.to_string(),
                message: self.message,
                fields: self.fields,
            }
        } else {
            // Internal faults are logged server-side and surfaced as an
            // opaque body carrying only a correlation id.
            let correlation_id = Uuid::new_v4();
            tracing::error!(
                kind = %self.kind,
                error = %self.message,
                correlation_id = %correlation_id,
                "Internal server error"
            );
            ApiErrorResponse {
                code: "INTERNAL".to_string(),
                message: format!("Internal error (correlation id: {correlation_id})"),
                fields: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            fields: self.fields.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_facing_kinds() {
        assert!(AppError::bad_credentials("x").is_client_facing());
        assert!(AppError::not_found("x").is_client_facing());
        assert!(!AppError::database("x").is_client_facing());
        assert!(!AppError::crypto("x").is_client_facing());
    }

    #[test]
    fn kind_display_codes() {
        assert_eq!(ErrorKind::BadCredentials.to_string(), "BAD_CREDENTIALS");
        assert_eq!(ErrorKind::EmailTaken.to_string(), "EMAIL_TAKEN");
        assert_eq!(
            ErrorKind::UpstreamUnavailable.to_string(),
            "UPSTREAM_UNAVAILABLE"
        );
    }
}
