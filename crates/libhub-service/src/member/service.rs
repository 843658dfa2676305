//! Member self-service: profile completion and document upload.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use libhub_auth::store::MemberStore;
use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::member::{MemberProfile, ProfileCompletion};

use crate::context::RequestContext;

/// Handles member-initiated profile mutations.
#[derive(Clone)]
pub struct MemberService {
    members: Arc<dyn MemberStore>,
}

impl std::fmt::Debug for MemberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberService").finish()
    }
}

impl MemberService {
    /// Creates a new member service.
    pub fn new(members: Arc<dyn MemberStore>) -> Self {
        Self { members }
    }

    /// Complete the caller's profile and assign a department-scoped
    /// display id (`CSE001` style).
    ///
    /// The display id is derived from the current department head-count;
    /// the unique constraint on `display_id` catches the rare collision
    /// between two simultaneous completions.
    pub async fn complete_profile(
        &self,
        ctx: &RequestContext,
        completion: ProfileCompletion,
    ) -> AppResult<MemberProfile> {
        let profile = ctx.require_member()?;

        if completion.mobile.trim().is_empty() {
            return Err(AppError::validation("Mobile number is required"));
        }
        if completion.department.trim().is_empty() {
            return Err(AppError::validation("Department is required"));
        }

        let display_id = if let Some(existing) = &profile.display_id {
            existing.clone()
        } else {
            let count = self
                .members
                .count_by_department(&completion.department)
                .await?;
            format!("{}{:03}", completion.department, count + 1)
        };

        let updated = self
            .members
            .complete_profile(&profile.subject_id, &completion, &display_id)
            .await?;

        info!(
            subject_id = %updated.subject_id,
            display_id = %display_id,
            "Profile completed"
        );

        Ok(updated)
    }

    /// Record an identity-document upload for the caller:
    /// `NotUploaded | Rejected → Pending`.
    pub async fn upload_id_proof(
        &self,
        ctx: &RequestContext,
        url: String,
    ) -> AppResult<MemberProfile> {
        if url.trim().is_empty() {
            return Err(AppError::validation("Document URL is required"));
        }

        let profile = ctx.require_member()?;

        // Re-read so the transition applies to the freshest state; the
        // compare-and-set below catches anything that slips through.
        let mut current = self
            .members
            .find_by_subject_id(&profile.subject_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Member {} not found", profile.subject_id))
            })?;

        let expected = current.id_proof_status;
        current.record_upload(url, Utc::now())?;

        let updated = self
            .members
            .update_verification_state(&current, expected)
            .await?;

        info!(
            subject_id = %updated.subject_id,
            "Identity document uploaded, verification pending"
        );

        Ok(updated)
    }
}
