//! `AuthIdentity` extractor — pulls the bearer token from the
//! Authorization header, verifies it with the provider, resolves the
//! profile, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use libhub_core::error::AppError;
use libhub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated identity available in handlers.
///
/// Resolution runs in role-discovery mode on every protected request, so
/// a suspension applied mid-session takes effect on the very next call.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub RequestContext);

impl AuthIdentity {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthIdentity {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::token_invalid("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::token_invalid("Invalid Authorization header format"))?;

        let identity = state.token_verifier.verify(token).await?;
        let resolved = state.resolver.resolve(&identity, None).await?;

        Ok(AuthIdentity(RequestContext::new(resolved)))
    }
}
