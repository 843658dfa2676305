//! Member profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use libhub_core::error::AppError;
use libhub_core::result::AppResult;

use super::verification::VerificationStatus;

/// Default role assigned to a synchronized or registered member.
pub const DEFAULT_MEMBER_ROLE: &str = "member";

/// An ordinary library member, keyed by the identity provider's subject id.
///
/// Rows are created at first successful login (synchronization) or explicit
/// registration, mutated by the member (profile completion, document upload)
/// and by operators (suspension, verification decisions), and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberProfile {
    /// Opaque subject id issued by the identity provider. Unique.
    pub subject_id: String,
    /// Human-readable, system-generated id (e.g. `CSE001`). Assigned at
    /// profile completion.
    pub display_id: Option<String>,
    /// Email address from the identity token.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Mobile number, supplied at profile completion.
    pub mobile: Option<String>,
    /// Department code, supplied at profile completion.
    pub department: Option<String>,
    /// Semester number, supplied at profile completion.
    pub semester: Option<i32>,
    /// Role string, fixed to `"member"` unless reassigned by an operator.
    pub role: String,
    /// Whether the account is suspended.
    pub suspended: bool,
    /// When the account was last suspended.
    pub suspended_at: Option<DateTime<Utc>>,
    /// Whether the member has completed their profile.
    pub profile_completed: bool,
    /// URL of the uploaded identity document, if any.
    pub id_proof_url: Option<String>,
    /// Current verification state of the identity document.
    pub id_proof_status: VerificationStatus,
    /// Rejection reason. Invariant: `Verified` implies `None`.
    pub id_proof_rejection_reason: Option<String>,
    /// When the current document was uploaded.
    pub id_proof_uploaded_at: Option<DateTime<Utc>>,
    /// When the document was approved.
    pub id_proof_verified_at: Option<DateTime<Utc>>,
    /// When the profile row was created.
    pub created_at: DateTime<Utc>,
    /// When the profile row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl MemberProfile {
    /// Whether the member's identity document is currently verified.
    pub fn is_verified(&self) -> bool {
        self.id_proof_status == VerificationStatus::Verified
    }

    /// Whether the account is usable: not suspended.
    pub fn is_active(&self) -> bool {
        !self.suspended
    }

    /// Record a document upload: `NotUploaded | Rejected → Pending`.
    ///
    /// Clears any previous rejection reason; the new document supersedes
    /// the rejected one.
    pub fn record_upload(&mut self, url: String, now: DateTime<Utc>) -> AppResult<()> {
        if !self.id_proof_status.can_upload() {
            return Err(AppError::validation(format!(
                "Cannot upload a document while verification is {}",
                self.id_proof_status
            )));
        }
        self.id_proof_url = Some(url);
        self.id_proof_status = VerificationStatus::Pending;
        self.id_proof_rejection_reason = None;
        self.id_proof_uploaded_at = Some(now);
        self.id_proof_verified_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Operator approval: `Pending → Verified`. Clears the rejection reason.
    pub fn approve_id_proof(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if !self.id_proof_status.awaiting_decision() {
            return Err(AppError::validation(format!(
                "Cannot approve a document in state {}",
                self.id_proof_status
            )));
        }
        self.id_proof_status = VerificationStatus::Verified;
        self.id_proof_rejection_reason = None;
        self.id_proof_verified_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Operator rejection with a mandatory non-empty reason:
    /// `Pending | Verified → Rejected`.
    ///
    /// Rejecting a `Verified` document is the reversal path: it demotes the
    /// member back into the re-upload flow.
    pub fn reject_id_proof(&mut self, reason: &str, now: DateTime<Utc>) -> AppResult<()> {
        if reason.trim().is_empty() {
            return Err(AppError::validation(
                "A rejection reason is required when rejecting a document",
            ));
        }
        match self.id_proof_status {
            VerificationStatus::Pending | VerificationStatus::Verified => {}
            other => {
                return Err(AppError::validation(format!(
                    "Cannot reject a document in state {other}"
                )));
            }
        }
        self.id_proof_status = VerificationStatus::Rejected;
        self.id_proof_rejection_reason = Some(reason.trim().to_string());
        self.id_proof_verified_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Operator suspension toggle, valid in any verification state.
    pub fn set_suspended(&mut self, suspended: bool, now: DateTime<Utc>) {
        self.suspended = suspended;
        self.suspended_at = if suspended { Some(now) } else { None };
        self.updated_at = now;
    }
}

/// Data required to create a new member profile.
///
/// Used both by first-login synchronization (from identity token data) and
/// explicit registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberProfile {
    /// Provider subject id.
    pub subject_id: String,
    /// Email from the identity token.
    pub email: String,
    /// Display name from the identity token.
    pub name: String,
    /// Role, defaulted to [`DEFAULT_MEMBER_ROLE`].
    pub role: String,
}

impl CreateMemberProfile {
    /// Build the synchronization payload from identity token data.
    ///
    /// A synchronized profile starts with `NotUploaded` verification,
    /// `Active` suspension, and an incomplete profile.
    pub fn from_token_data(subject_id: &str, email: &str, display_name: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            email: email.to_string(),
            name: if display_name.trim().is_empty() {
                email.to_string()
            } else {
                display_name.to_string()
            },
            role: DEFAULT_MEMBER_ROLE.to_string(),
        }
    }
}

/// Fields written at profile completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCompletion {
    /// Mobile number.
    pub mobile: String,
    /// Department code (drives display-id generation).
    pub department: String,
    /// Semester number.
    pub semester: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile() -> MemberProfile {
        let now = Utc::now();
        MemberProfile {
            subject_id: "subject-1".to_string(),
            display_id: None,
            email: "s1@example.edu".to_string(),
            name: "Student One".to_string(),
            mobile: None,
            department: None,
            semester: None,
            role: DEFAULT_MEMBER_ROLE.to_string(),
            suspended: false,
            suspended_at: None,
            profile_completed: false,
            id_proof_url: None,
            id_proof_status: VerificationStatus::NotUploaded,
            id_proof_rejection_reason: None,
            id_proof_uploaded_at: None,
            id_proof_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_upload_moves_to_pending() {
        let mut p = new_profile();
        p.record_upload("https://cdn/id1.png".into(), Utc::now()).unwrap();
        assert_eq!(p.id_proof_status, VerificationStatus::Pending);
        assert!(p.id_proof_uploaded_at.is_some());
    }

    #[test]
    fn test_upload_rejected_while_pending_or_verified() {
        let mut p = new_profile();
        p.record_upload("https://cdn/id1.png".into(), Utc::now()).unwrap();
        assert!(p.record_upload("https://cdn/id2.png".into(), Utc::now()).is_err());

        p.approve_id_proof(Utc::now()).unwrap();
        assert!(p.record_upload("https://cdn/id3.png".into(), Utc::now()).is_err());
    }

    #[test]
    fn test_approve_clears_rejection_reason() {
        let mut p = new_profile();
        p.record_upload("https://cdn/id1.png".into(), Utc::now()).unwrap();
        p.reject_id_proof("blurry scan", Utc::now()).unwrap();
        assert_eq!(p.id_proof_status, VerificationStatus::Rejected);
        assert_eq!(p.id_proof_rejection_reason.as_deref(), Some("blurry scan"));

        // Re-upload and approve: reason must be gone.
        p.record_upload("https://cdn/id2.png".into(), Utc::now()).unwrap();
        p.approve_id_proof(Utc::now()).unwrap();
        assert_eq!(p.id_proof_status, VerificationStatus::Verified);
        assert!(p.id_proof_rejection_reason.is_none());
        assert!(p.id_proof_verified_at.is_some());
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut p = new_profile();
        p.record_upload("https://cdn/id1.png".into(), Utc::now()).unwrap();
        let before = p.id_proof_status;
        assert!(p.reject_id_proof("  ", Utc::now()).is_err());
        // No state transition on a failed rejection.
        assert_eq!(p.id_proof_status, before);
        assert!(p.id_proof_rejection_reason.is_none());
    }

    #[test]
    fn test_approve_requires_pending() {
        let mut p = new_profile();
        assert!(p.approve_id_proof(Utc::now()).is_err());
        assert_eq!(p.id_proof_status, VerificationStatus::NotUploaded);
    }

    #[test]
    fn test_verified_can_be_reversed_by_rejection() {
        let mut p = new_profile();
        p.record_upload("https://cdn/id1.png".into(), Utc::now()).unwrap();
        p.approve_id_proof(Utc::now()).unwrap();

        p.reject_id_proof("document expired", Utc::now()).unwrap();
        assert_eq!(p.id_proof_status, VerificationStatus::Rejected);
        assert!(p.id_proof_verified_at.is_none());

        // Rejected → Pending is the only exit.
        p.record_upload("https://cdn/id2.png".into(), Utc::now()).unwrap();
        assert_eq!(p.id_proof_status, VerificationStatus::Pending);
    }

    #[test]
    fn test_suspension_is_independent_of_verification() {
        let mut p = new_profile();
        p.set_suspended(true, Utc::now());
        assert!(p.suspended);
        assert!(p.suspended_at.is_some());

        // Suspension does not block verification transitions.
        p.record_upload("https://cdn/id1.png".into(), Utc::now()).unwrap();
        assert_eq!(p.id_proof_status, VerificationStatus::Pending);

        p.set_suspended(false, Utc::now());
        assert!(!p.suspended);
        assert!(p.suspended_at.is_none());
    }

    #[test]
    fn test_sync_payload_defaults() {
        let c = CreateMemberProfile::from_token_data("s1", "s1@example.edu", "");
        assert_eq!(c.name, "s1@example.edu");
        assert_eq!(c.role, DEFAULT_MEMBER_ROLE);
    }
}
