//! Auth handlers — login, logout, me.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use libhub_auth::resolver::{IdentityClass, ResolvedIdentity};
use libhub_core::error::AppError;

use crate::dto::request::{LoginRequest, LogoutRequest};
use crate::dto::response::{ApiResponse, LoginResponse, LogoutResponse};
use crate::error::ApiError;
use crate::extractors::AuthIdentity;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let requested = req
        .requested_class
        .as_deref()
        .map(str::parse::<IdentityClass>)
        .transpose()?;

    let outcome = state
        .login_service
        .login(&req.email, &req.password, requested)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: outcome.token.token,
        expires_at: outcome.token.expires_at,
        identity: outcome.identity,
    })))
}

/// POST /api/auth/logout
///
/// Members get a session record computed from the caller-supplied login
/// time; a failed ledger write surfaces as an error rather than being
/// dropped.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<LogoutResponse>>, ApiError> {
    let record = match &auth.identity {
        ResolvedIdentity::Member(profile) => {
            Some(state.session_ledger.close(profile, req.login_time).await?)
        }
        ResolvedIdentity::Operator(_) => None,
    };

    Ok(Json(ApiResponse::ok(LogoutResponse { record })))
}

/// GET /api/auth/me
pub async fn me(auth: AuthIdentity) -> Json<ApiResponse<ResolvedIdentity>> {
    Json(ApiResponse::ok(auth.0.identity))
}
