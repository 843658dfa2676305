//! Token verification boundary.

use std::sync::Arc;

use chrono::Utc;

use libhub_core::error::AppError;
use libhub_core::result::AppResult;

use super::identity::{IdentityProvider, ProviderIdentity};

/// Validates bearer tokens against the identity provider.
///
/// Pure verification boundary: no role knowledge, no side effects. The
/// provider decides structural validity; this type adds the expiry check
/// so that callers see `TokenExpired` distinctly from `TokenInvalid`.
#[derive(Clone)]
pub struct TokenVerifier {
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish()
    }
}

impl TokenVerifier {
    /// Create a verifier over the given provider.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Verify a bearer token and return the identity it attests.
    pub async fn verify(&self, token: &str) -> AppResult<ProviderIdentity> {
        let identity = self.provider.verify_token(token).await?;

        if identity.expires_at <= Utc::now() {
            return Err(AppError::token_expired("Bearer token has expired"));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockIdentityProvider;
    use chrono::Duration;
    use libhub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_verify_valid_token() {
        let provider = Arc::new(MockIdentityProvider::new());
        provider.register_account("s1", "s1@example.edu", "pw", "Student One");
        let token = provider.issue_token("s1", Utc::now() + Duration::hours(1));

        let verifier = TokenVerifier::new(provider);
        let identity = verifier.verify(&token).await.unwrap();
        assert_eq!(identity.subject_id, "s1");
        assert_eq!(identity.email, "s1@example.edu");
    }

    #[tokio::test]
    async fn test_verify_unknown_token() {
        let provider = Arc::new(MockIdentityProvider::new());
        let verifier = TokenVerifier::new(provider);

        let err = verifier.verify("no-such-token").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[tokio::test]
    async fn test_verify_expired_token() {
        let provider = Arc::new(MockIdentityProvider::new());
        provider.register_account("s1", "s1@example.edu", "pw", "Student One");
        let token = provider.issue_token("s1", Utc::now() - Duration::seconds(1));

        let verifier = TokenVerifier::new(provider);
        let err = verifier.verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }
}
