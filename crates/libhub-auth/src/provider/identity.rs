//! Identity provider contract and token data types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use libhub_core::result::AppResult;

/// An opaque, time-bound bearer token issued by the identity provider.
///
/// Never persisted by this subsystem; it travels from sign-in to the
/// client and comes back on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderToken {
    /// The opaque token string.
    pub token: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// The identity attested by a verified token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Opaque subject id, stable across logins.
    pub subject_id: String,
    /// Email address on the provider account.
    pub email: String,
    /// Display name on the provider account (may be empty).
    pub display_name: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

/// Boundary to the external identity provider.
///
/// The provider is the sole owner of credentials and token validity.
/// Every method is a single network round-trip; there is no local token
/// state to keep consistent.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<ProviderToken>;

    /// Validate a bearer token and return the identity it attests.
    ///
    /// Any provider-side rejection, parse failure, or timeout maps to
    /// `TokenInvalid` — never to an implicit allow.
    async fn verify_token(&self, token: &str) -> AppResult<ProviderIdentity>;

    /// Revoke all outstanding tokens for a subject (forced sign-out).
    async fn invalidate(&self, subject_id: &str) -> AppResult<()>;
}
