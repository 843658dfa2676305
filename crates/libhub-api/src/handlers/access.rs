//! Resource access handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use libhub_auth::policy::Decision;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthIdentity;
use crate::state::AppState;

/// GET /api/books/{id}/access
///
/// Always 200 for a well-formed request against a known book; a denial
/// is data, not an error.
pub async fn check_access(
    State(state): State<AppState>,
    auth: AuthIdentity,
    Path(book_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Decision>>, ApiError> {
    let profile = auth.require_member()?;
    let decision = state.access_service.check(profile, book_id).await?;
    Ok(Json(ApiResponse::ok(decision)))
}
