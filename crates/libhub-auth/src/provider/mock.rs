//! In-memory identity provider used by tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use libhub_core::error::AppError;
use libhub_core::result::AppResult;

use super::identity::{IdentityProvider, ProviderIdentity, ProviderToken};

#[derive(Debug, Clone)]
struct MockAccount {
    subject_id: String,
    email: String,
    password: String,
    display_name: String,
}

#[derive(Debug, Clone)]
struct MockToken {
    subject_id: String,
    expires_at: DateTime<Utc>,
}

/// Identity provider backed by in-process maps.
///
/// Mirrors the contract of the HTTP provider: unknown tokens and revoked
/// subjects fail with `TokenInvalid`, and `invalidate` drops every
/// outstanding token for the subject.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, MockAccount>>,
    tokens: Mutex<HashMap<String, MockToken>>,
}

impl MockIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that can sign in.
    pub fn register_account(&self, subject_id: &str, email: &str, password: &str, name: &str) {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            MockAccount {
                subject_id: subject_id.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                display_name: name.to_string(),
            },
        );
    }

    /// Issue a token for a registered subject with an explicit expiry.
    pub fn issue_token(&self, subject_id: &str, expires_at: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.lock().unwrap().insert(
            token.clone(),
            MockToken {
                subject_id: subject_id.to_string(),
                expires_at,
            },
        );
        token
    }

    /// Whether any token is outstanding for the subject.
    pub fn has_tokens_for(&self, subject_id: &str) -> bool {
        self.tokens
            .lock()
            .unwrap()
            .values()
            .any(|t| t.subject_id == subject_id)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<ProviderToken> {
        let account = {
            let accounts = self.accounts.lock().unwrap();
            accounts.get(email).cloned()
        };

        match account {
            Some(account) if account.password == password => {
                let expires_at = Utc::now() + Duration::hours(1);
                let token = self.issue_token(&account.subject_id, expires_at);
                Ok(ProviderToken { token, expires_at })
            }
            _ => Err(AppError::token_invalid(
                "Identity provider rejected the credentials",
            )),
        }
    }

    async fn verify_token(&self, token: &str) -> AppResult<ProviderIdentity> {
        let entry = {
            let tokens = self.tokens.lock().unwrap();
            tokens.get(token).cloned()
        };

        let entry = entry
            .ok_or_else(|| AppError::token_invalid("Identity provider rejected the token"))?;

        let account = {
            let accounts = self.accounts.lock().unwrap();
            accounts
                .values()
                .find(|a| a.subject_id == entry.subject_id)
                .cloned()
        };

        let account = account
            .ok_or_else(|| AppError::token_invalid("Token subject no longer exists"))?;

        Ok(ProviderIdentity {
            subject_id: account.subject_id,
            email: account.email,
            display_name: account.display_name,
            expires_at: entry.expires_at,
        })
    }

    async fn invalidate(&self, subject_id: &str) -> AppResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .retain(|_, t| t.subject_id != subject_id);
        Ok(())
    }
}
