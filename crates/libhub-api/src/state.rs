//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use libhub_auth::provider::{IdentityProvider, TokenVerifier};
use libhub_auth::resolver::ProfileResolver;
use libhub_core::config::AppConfig;
use libhub_service::access::AccessService;
use libhub_service::admin::AdminService;
use libhub_service::login::LoginService;
use libhub_service::member::MemberService;
use libhub_service::session::SessionLedger;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or internally cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks).
    pub db_pool: PgPool,

    /// Identity provider boundary.
    pub provider: Arc<dyn IdentityProvider>,
    /// Bearer-token verifier.
    pub token_verifier: TokenVerifier,
    /// Member/operator profile resolver.
    pub resolver: ProfileResolver,

    /// Login orchestration.
    pub login_service: LoginService,
    /// Session ledger.
    pub session_ledger: SessionLedger,
    /// Access decisions.
    pub access_service: AccessService,
    /// Member self-service.
    pub member_service: MemberService,
    /// Operator administration.
    pub admin_service: AdminService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
