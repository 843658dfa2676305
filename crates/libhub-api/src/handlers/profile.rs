//! Member self-service handlers.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use libhub_core::error::AppError;
use libhub_entity::member::{MemberProfile, ProfileCompletion};

use crate::dto::request::{CompleteProfileRequest, UploadIdProofRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthIdentity;
use crate::state::AppState;

/// POST /api/profile/complete
pub async fn complete_profile(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Json(req): Json<CompleteProfileRequest>,
) -> Result<Json<ApiResponse<MemberProfile>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let updated = state
        .member_service
        .complete_profile(
            &auth.0,
            ProfileCompletion {
                mobile: req.mobile,
                department: req.department,
                semester: req.semester,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/profile/id-proof
pub async fn upload_id_proof(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Json(req): Json<UploadIdProofRequest>,
) -> Result<Json<ApiResponse<MemberProfile>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let updated = state
        .member_service
        .upload_id_proof(&auth.0, req.url)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}
