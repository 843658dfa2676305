//! Maps domain `AppError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use libhub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Newtype over [`AppError`] carrying the HTTP mapping.
///
/// Handlers return `Result<_, ApiError>`; the `?` operator lifts any
/// `AppError` through the `From` impl.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err.kind {
            // Authentication failures: the caller must re-authenticate.
            ErrorKind::TokenInvalid | ErrorKind::TokenExpired => StatusCode::UNAUTHORIZED,
            // Authorization failures: each carries a distinct code so the
            // UI can sign out and show a specific message.
            ErrorKind::AccountSuspended | ErrorKind::WrongPortal | ErrorKind::NotAuthorized => {
                StatusCode::FORBIDDEN
            }
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::ExternalService
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(error = %err.message, kind = %err.kind, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(err: AppError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_authorization_failures_are_forbidden_with_distinct_codes() {
        assert_eq!(
            status_for(AppError::account_suspended("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(AppError::wrong_portal("x")), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(AppError::not_authorized("x")),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_token_failures_are_unauthorized() {
        assert_eq!(
            status_for(AppError::token_invalid("x")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(AppError::token_expired("x")),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_store_unavailable_is_503() {
        assert_eq!(
            status_for(AppError::store_unavailable("x")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
