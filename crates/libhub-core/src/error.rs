//! Unified application error types for LibHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
///
/// The first five variants form the authentication/authorization taxonomy:
/// token failures are terminal (the caller must re-authenticate), while
/// `AccountSuspended`, `WrongPortal`, and `NotAuthorized` each carry a
/// distinct machine-readable code so the UI can show a specific message
/// and force a sign-out instead of a generic error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The identity provider rejected or could not parse the token.
    TokenInvalid,
    /// The token's expiry timestamp has passed.
    TokenExpired,
    /// The member account is suspended; the session must be terminated.
    AccountSuspended,
    /// An operator identity attempted the member entry point (or vice versa).
    WrongPortal,
    /// The caller does not have permission to perform the action.
    NotAuthorized,
    /// Input validation failed.
    Validation,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// A profile, session, or catalog store is temporarily unreachable.
    StoreUnavailable,
    /// The identity provider or another external service failed.
    ExternalService,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenInvalid => write!(f, "TOKEN_INVALID"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::AccountSuspended => write!(f, "ACCOUNT_SUSPENDED"),
            Self::WrongPortal => write!(f, "WRONG_PORTAL"),
            Self::NotAuthorized => write!(f, "NOT_AUTHORIZED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout LibHub.
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
            source: Some(Box::new(source)),
        }
    }

    /// Create a token-invalid error.
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create an account-suspended error.
    pub fn account_suspended(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountSuspended, message)
    }

    /// Create a wrong-portal error.
    pub fn wrong_portal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongPortal, message)
    }

    /// Create a not-authorized error.
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is one of the authorization failures that must
    /// force a provider-side sign-out: suspended accounts and portal
    /// mismatches terminate the session token.
    pub fn requires_sign_out(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::AccountSuspended | ErrorKind::WrongPortal
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
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
    fn test_sign_out_required_kinds() {
        assert!(AppError::account_suspended("suspended").requires_sign_out());
        assert!(AppError::wrong_portal("wrong portal").requires_sign_out());
        assert!(!AppError::token_invalid("bad token").requires_sign_out());
        assert!(!AppError::not_authorized("no").requires_sign_out());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorKind::AccountSuspended.to_string(), "ACCOUNT_SUSPENDED");
        assert_eq!(ErrorKind::WrongPortal.to_string(), "WRONG_PORTAL");
        assert_eq!(ErrorKind::StoreUnavailable.to_string(), "STORE_UNAVAILABLE");
    }
}
