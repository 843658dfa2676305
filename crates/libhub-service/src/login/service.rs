//! Login flow: credentials → token → verified identity → resolved profile.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use libhub_auth::provider::{IdentityProvider, ProviderToken, TokenVerifier};
use libhub_auth::resolver::{IdentityClass, ProfileResolver, ResolvedIdentity};
use libhub_auth::store::OperatorStore;
use libhub_core::result::AppResult;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// The resolved identity (class + profile).
    pub identity: ResolvedIdentity,
    /// The provider token for subsequent requests.
    pub token: ProviderToken,
}

/// Orchestrates the login pipeline against the identity provider and the
/// profile stores.
#[derive(Clone)]
pub struct LoginService {
    provider: Arc<dyn IdentityProvider>,
    verifier: TokenVerifier,
    resolver: ProfileResolver,
    operators: Arc<dyn OperatorStore>,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService").finish()
    }
}

impl LoginService {
    /// Creates a new login service.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        verifier: TokenVerifier,
        resolver: ProfileResolver,
        operators: Arc<dyn OperatorStore>,
    ) -> Self {
        Self {
            provider,
            verifier,
            resolver,
            operators,
        }
    }

    /// Sign in with provider credentials and resolve the identity class.
    ///
    /// On `AccountSuspended` or `WrongPortal` the freshly issued token is
    /// invalidated at the provider before the error is returned, so the
    /// rejected identity holds no usable session token.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested: Option<IdentityClass>,
    ) -> AppResult<LoginOutcome> {
        let token = self.provider.sign_in(email, password).await?;
        let identity = self.verifier.verify(&token.token).await?;

        match self.resolver.resolve(&identity, requested).await {
            Ok(resolved) => {
                if resolved.class() == IdentityClass::Operator {
                    // Best effort; a failed stamp must not fail the login.
                    if let Err(e) = self
                        .operators
                        .record_login(resolved.subject_id(), Utc::now())
                        .await
                    {
                        warn!(
                            subject_id = %resolved.subject_id(),
                            error = %e,
                            "Failed to stamp operator login"
                        );
                    }
                }

                info!(
                    subject_id = %resolved.subject_id(),
                    class = %resolved.class(),
                    "Login succeeded"
                );
                Ok(LoginOutcome {
                    identity: resolved,
                    token,
                })
            }
            Err(e) => {
                if e.requires_sign_out() {
                    if let Err(inv) = self.provider.invalidate(&identity.subject_id).await {
                        warn!(
                            subject_id = %identity.subject_id,
                            error = %inv,
                            "Failed to invalidate token after rejected login"
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use libhub_auth::provider::MockIdentityProvider;
    use libhub_auth::store::{InMemoryMemberStore, InMemoryOperatorStore, MemberStore};
    use libhub_core::error::ErrorKind;
    use libhub_entity::operator::OperatorProfile;

    struct Harness {
        provider: Arc<MockIdentityProvider>,
        members: Arc<InMemoryMemberStore>,
        operators: Arc<InMemoryOperatorStore>,
        service: LoginService,
    }

    fn harness() -> Harness {
        let provider = Arc::new(MockIdentityProvider::new());
        let members = Arc::new(InMemoryMemberStore::new());
        let operators = Arc::new(InMemoryOperatorStore::new());

        let service = LoginService::new(
            provider.clone(),
            TokenVerifier::new(provider.clone()),
            ProfileResolver::new(members.clone(), operators.clone()),
            operators.clone(),
        );

        Harness {
            provider,
            members,
            operators,
            service,
        }
    }

    fn operator_row(subject_id: &str) -> OperatorProfile {
        OperatorProfile {
            subject_id: subject_id.to_string(),
            email: format!("{subject_id}@example.edu"),
            name: format!("Operator {subject_id}"),
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn test_member_first_login_creates_profile() {
        let h = harness();
        h.provider
            .register_account("s1", "s1@example.edu", "pw", "Student One");

        let outcome = h
            .service
            .login("s1@example.edu", "pw", Some(IdentityClass::Member))
            .await
            .unwrap();

        assert_eq!(outcome.identity.class(), IdentityClass::Member);
        assert_eq!(h.members.row_count(), 1);
        assert!(!outcome.token.token.is_empty());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_token_invalid() {
        let h = harness();
        h.provider
            .register_account("s1", "s1@example.edu", "pw", "Student One");

        let err = h
            .service
            .login("s1@example.edu", "wrong", Some(IdentityClass::Member))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[tokio::test]
    async fn test_suspended_login_invalidates_token() {
        let h = harness();
        h.provider
            .register_account("s1", "s1@example.edu", "pw", "Student One");

        // First login creates the profile, then an operator suspends it.
        h.service
            .login("s1@example.edu", "pw", Some(IdentityClass::Member))
            .await
            .unwrap();
        let mut profile = h
            .members
            .find_by_subject_id("s1")
            .await
            .unwrap()
            .unwrap();
        profile.set_suspended(true, Utc::now());
        h.members.insert_row(profile);

        let err = h
            .service
            .login("s1@example.edu", "pw", Some(IdentityClass::Member))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::AccountSuspended);
        // The provider-side session was terminated.
        assert!(!h.provider.has_tokens_for("s1"));
    }

    #[tokio::test]
    async fn test_operator_on_member_portal_is_signed_out() {
        let h = harness();
        h.provider
            .register_account("o1", "o1@example.edu", "pw", "Operator One");
        h.operators.insert_row(operator_row("o1"));

        let err = h
            .service
            .login("o1@example.edu", "pw", Some(IdentityClass::Member))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::WrongPortal);
        assert!(!h.provider.has_tokens_for("o1"));
        // Never silently treated as member.
        assert_eq!(h.members.row_count(), 0);
    }

    #[tokio::test]
    async fn test_operator_login_stamps_last_login() {
        let h = harness();
        h.provider
            .register_account("o1", "o1@example.edu", "pw", "Operator One");
        h.operators.insert_row(operator_row("o1"));

        let outcome = h
            .service
            .login("o1@example.edu", "pw", Some(IdentityClass::Operator))
            .await
            .unwrap();

        assert_eq!(outcome.identity.class(), IdentityClass::Operator);
        let stamped = h
            .operators
            .find_by_subject_id("o1")
            .await
            .unwrap()
            .unwrap();
        assert!(stamped.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_operator_is_not_authorized() {
        let h = harness();
        h.provider
            .register_account("s1", "s1@example.edu", "pw", "Student One");

        let err = h
            .service
            .login("s1@example.edu", "pw", Some(IdentityClass::Operator))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthorized);
    }
}
