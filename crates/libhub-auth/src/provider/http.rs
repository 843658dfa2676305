//! HTTP client for the external identity provider's REST API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use libhub_core::config::IdentityProviderConfig;
use libhub_core::error::AppError;
use libhub_core::result::AppResult;

use super::identity::{IdentityProvider, ProviderIdentity, ProviderToken};

/// Identity provider client over its REST API.
///
/// All calls are single synchronous round-trips with a hard timeout. A
/// timed-out or failed verification is reported as `TokenInvalid`; there
/// is no fallback-allow path.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    subject_id: String,
    email: String,
    #[serde(default)]
    display_name: String,
    expires_at: DateTime<Utc>,
}

impl HttpIdentityProvider {
    /// Build a client from provider configuration.
    pub fn new(config: &IdentityProviderConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    libhub_core::error::ErrorKind::Configuration,
                    "Failed to build identity provider HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<ProviderToken> {
        let response = self
            .client
            .post(self.url("/sessions"))
            .header("x-api-key", &self.api_key)
            .json(&SignInRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    libhub_core::error::ErrorKind::ExternalService,
                    "Identity provider unreachable during sign-in",
                    e,
                )
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::BAD_REQUEST
        {
            return Err(AppError::token_invalid(
                "Identity provider rejected the credentials",
            ));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Identity provider sign-in failed with status {}",
                response.status()
            )));
        }

        let body: SignInResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                libhub_core::error::ErrorKind::ExternalService,
                "Malformed sign-in response from identity provider",
                e,
            )
        })?;

        Ok(ProviderToken {
            token: body.token,
            expires_at: body.expires_at,
        })
    }

    async fn verify_token(&self, token: &str) -> AppResult<ProviderIdentity> {
        let response = self
            .client
            .post(self.url("/tokens/verify"))
            .header("x-api-key", &self.api_key)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| {
                // Includes timeouts: a verification we could not complete
                // is an invalid token, never an allow.
                AppError::with_source(
                    libhub_core::error::ErrorKind::TokenInvalid,
                    "Token verification did not complete",
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::token_invalid(
                "Identity provider rejected the token",
            ));
        }

        let body: VerifyResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                libhub_core::error::ErrorKind::TokenInvalid,
                "Malformed verification response from identity provider",
                e,
            )
        })?;

        Ok(ProviderIdentity {
            subject_id: body.subject_id,
            email: body.email,
            display_name: body.display_name,
            expires_at: body.expires_at,
        })
    }

    async fn invalidate(&self, subject_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/sessions/{subject_id}")))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    libhub_core::error::ErrorKind::ExternalService,
                    "Identity provider unreachable during invalidation",
                    e,
                )
            })?;

        if !response.status().is_success() {
            warn!(
                subject_id = %subject_id,
                status = %response.status(),
                "Provider refused token invalidation"
            );
            return Err(AppError::external_service(format!(
                "Token invalidation failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libhub_core::error::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> IdentityProviderConfig {
        IdentityProviderConfig {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            request_timeout_seconds: 2,
        }
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "opaque-token-1",
                "expires_at": "2030-01-01T00:00:00Z",
            })))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(&config_for(&server)).unwrap();
        let token = provider.sign_in("s1@example.edu", "pw").await.unwrap();
        assert_eq!(token.token, "opaque-token-1");
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(&config_for(&server)).unwrap();
        let err = provider.sign_in("s1@example.edu", "nope").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[tokio::test]
    async fn test_verify_token_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tokens/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "subject_id": "s1",
                "email": "s1@example.edu",
                "display_name": "Student One",
                "expires_at": "2030-01-01T00:00:00Z",
            })))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(&config_for(&server)).unwrap();
        let identity = provider.verify_token("opaque-token-1").await.unwrap();
        assert_eq!(identity.subject_id, "s1");
        assert_eq!(identity.display_name, "Student One");
    }

    #[tokio::test]
    async fn test_verify_token_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tokens/verify"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(&config_for(&server)).unwrap();
        let err = provider.verify_token("garbage").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[tokio::test]
    async fn test_invalidate_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/sessions/s1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(&config_for(&server)).unwrap();
        provider.invalidate("s1").await.unwrap();
    }
}
