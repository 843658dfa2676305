//! Operator administration handlers.

use axum::extract::{Path, Query, State};
use axum::Json;

use libhub_entity::member::{MemberAnalytics, MemberFilter, MemberProfile, VerificationStatus};
use libhub_entity::session::SessionRecord;
use libhub_service::admin::MemberDetail;

use crate::dto::request::{MemberListQuery, SuspendRequest, VerifyIdProofRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthIdentity;
use crate::state::AppState;

/// GET /api/admin/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Query(query): Query<MemberListQuery>,
) -> Result<Json<ApiResponse<Vec<MemberProfile>>>, ApiError> {
    let verification = query
        .verification
        .as_deref()
        .map(str::parse::<VerificationStatus>)
        .transpose()?;

    let filter = MemberFilter {
        department: query.department,
        semester: query.semester,
        verification,
        suspended: query.suspended,
        search: query.search,
    };

    let members = state.admin_service.list_members(&auth.0, &filter).await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// GET /api/admin/members/{subject_id}
pub async fn member_detail(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(subject_id): Path<String>,
) -> Result<Json<ApiResponse<MemberDetail>>, ApiError> {
    let detail = state
        .admin_service
        .member_detail(&auth.0, &subject_id)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// GET /api/admin/members/{subject_id}/sessions
pub async fn member_sessions(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(subject_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<SessionRecord>>>, ApiError> {
    let history = state
        .admin_service
        .session_history(&auth.0, &subject_id)
        .await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// POST /api/admin/members/{subject_id}/verify
pub async fn verify_id_proof(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(subject_id): Path<String>,
    Json(req): Json<VerifyIdProofRequest>,
) -> Result<Json<ApiResponse<MemberProfile>>, ApiError> {
    let updated = state
        .admin_service
        .verify_id_proof(&auth.0, &subject_id, req.approved, req.reason.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/admin/members/{subject_id}/suspend
pub async fn suspend_member(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(subject_id): Path<String>,
    Json(req): Json<SuspendRequest>,
) -> Result<Json<ApiResponse<MemberProfile>>, ApiError> {
    let updated = state
        .admin_service
        .set_suspension(&auth.0, &subject_id, req.suspended)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// GET /api/admin/analytics/members
pub async fn member_analytics(
    State(state): State<AppState>,
    auth: AuthIdentity,
) -> Result<Json<ApiResponse<MemberAnalytics>>, ApiError> {
    let analytics = state.admin_service.member_analytics(&auth.0).await?;
    Ok(Json(ApiResponse::ok(analytics)))
}
