//! External identity provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external identity provider that issues and validates
/// the opaque bearer tokens this service consumes.
///
/// The provider is the single source of truth for credentials; this
/// service never sees or stores passwords beyond forwarding the sign-in
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProviderConfig {
    /// Base URL of the provider's REST API.
    pub base_url: String,
    /// API key sent with every provider request.
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds. A timed-out verification is
    /// treated as an invalid token, never as an implicit allow.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    10
}
