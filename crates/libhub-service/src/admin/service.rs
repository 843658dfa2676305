//! Operator administration: verification decisions, suspension, and the
//! member directory.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use libhub_auth::provider::IdentityProvider;
use libhub_auth::store::MemberStore;
use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::member::{MemberAnalytics, MemberFilter, MemberProfile};
use libhub_entity::purchase::PurchaseHistoryEntry;
use libhub_entity::session::SessionRecord;

use crate::context::RequestContext;
use crate::session::SessionLedger;
use crate::store::PurchaseStore;

/// A member profile with purchase context for the detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetail {
    /// The profile row.
    pub profile: MemberProfile,
    /// Completed purchases, newest first.
    pub purchases: Vec<PurchaseHistoryEntry>,
}

/// Operator-only member administration.
///
/// Every method requires an operator context. Verification and suspension
/// transitions are validated on the entity and persisted with the store's
/// compare-and-set guard; a lost race surfaces as `Conflict`.
#[derive(Clone)]
pub struct AdminService {
    members: Arc<dyn MemberStore>,
    purchases: Arc<dyn PurchaseStore>,
    ledger: SessionLedger,
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish()
    }
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        members: Arc<dyn MemberStore>,
        purchases: Arc<dyn PurchaseStore>,
        ledger: SessionLedger,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            members,
            purchases,
            ledger,
            provider,
        }
    }

    /// Apply a verification decision to a member's pending document.
    ///
    /// `approved == false` requires a non-empty reason; an empty reason is
    /// rejected before any state transition happens.
    pub async fn verify_id_proof(
        &self,
        ctx: &RequestContext,
        subject_id: &str,
        approved: bool,
        reason: Option<&str>,
    ) -> AppResult<MemberProfile> {
        let operator = ctx.require_operator()?;

        let mut profile = self.load_member(subject_id).await?;
        let expected = profile.id_proof_status;

        if approved {
            profile.approve_id_proof(Utc::now())?;
        } else {
            profile.reject_id_proof(reason.unwrap_or(""), Utc::now())?;
        }

        let updated = self
            .members
            .update_verification_state(&profile, expected)
            .await?;

        info!(
            operator = %operator.subject_id,
            subject_id = %subject_id,
            approved,
            "Verification decision applied"
        );

        Ok(updated)
    }

    /// Suspend or reactivate a member account.
    ///
    /// Suspension takes effect on the next request; outstanding provider
    /// tokens are invalidated so an active session cannot ride out the
    /// suspension.
    pub async fn set_suspension(
        &self,
        ctx: &RequestContext,
        subject_id: &str,
        suspended: bool,
    ) -> AppResult<MemberProfile> {
        let operator = ctx.require_operator()?;

        // Existence check keeps NotFound distinct from store failures.
        self.load_member(subject_id).await?;

        let suspended_at = suspended.then(Utc::now);
        let updated = self
            .members
            .update_suspension(subject_id, suspended, suspended_at)
            .await?;

        if suspended {
            if let Err(e) = self.provider.invalidate(subject_id).await {
                tracing::warn!(
                    subject_id = %subject_id,
                    error = %e,
                    "Failed to invalidate tokens for suspended member"
                );
            }
        }

        info!(
            operator = %operator.subject_id,
            subject_id = %subject_id,
            suspended,
            "Suspension state changed"
        );

        Ok(updated)
    }

    /// The member directory with filters.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        filter: &MemberFilter,
    ) -> AppResult<Vec<MemberProfile>> {
        ctx.require_operator()?;
        self.members.list(filter).await
    }

    /// One member with purchase history.
    pub async fn member_detail(
        &self,
        ctx: &RequestContext,
        subject_id: &str,
    ) -> AppResult<MemberDetail> {
        ctx.require_operator()?;

        // Operator consoles sometimes pass the display id instead of the
        // provider subject id; accept both.
        let profile = match self.members.find_by_subject_id(subject_id).await? {
            Some(profile) => profile,
            None => self
                .members
                .find_by_display_id(subject_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Member {subject_id} not found")))?,
        };

        let purchases = self
            .purchases
            .history_for_subject(&profile.subject_id)
            .await?;

        Ok(MemberDetail { profile, purchases })
    }

    /// Session history for one member.
    pub async fn session_history(
        &self,
        ctx: &RequestContext,
        subject_id: &str,
    ) -> AppResult<Vec<SessionRecord>> {
        ctx.require_operator()?;
        self.ledger.history(subject_id).await
    }

    /// Aggregate dashboard counters.
    pub async fn member_analytics(&self, ctx: &RequestContext) -> AppResult<MemberAnalytics> {
        ctx.require_operator()?;
        self.members.analytics().await
    }

    async fn load_member(&self, subject_id: &str) -> AppResult<MemberProfile> {
        self.members
            .find_by_subject_id(subject_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Member {subject_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryPurchaseStore, InMemorySessionStore};
    use libhub_auth::provider::MockIdentityProvider;
    use libhub_auth::resolver::ResolvedIdentity;
    use libhub_auth::store::InMemoryMemberStore;
    use libhub_core::error::ErrorKind;
    use libhub_entity::member::{CreateMemberProfile, VerificationStatus};
    use libhub_entity::operator::OperatorProfile;

    struct Harness {
        members: Arc<InMemoryMemberStore>,
        provider: Arc<MockIdentityProvider>,
        service: AdminService,
    }

    fn harness() -> Harness {
        let members = Arc::new(InMemoryMemberStore::new());
        let purchases = Arc::new(InMemoryPurchaseStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let provider = Arc::new(MockIdentityProvider::new());

        let service = AdminService::new(
            members.clone(),
            purchases,
            SessionLedger::new(sessions),
            provider.clone(),
        );

        Harness {
            members,
            provider,
            service,
        }
    }

    fn operator_ctx() -> RequestContext {
        RequestContext::new(ResolvedIdentity::Operator(OperatorProfile {
            subject_id: "o1".to_string(),
            email: "o1@example.edu".to_string(),
            name: "Operator".to_string(),
            created_at: Utc::now(),
            last_login_at: None,
        }))
    }

    async fn seed_pending_member(h: &Harness, subject_id: &str) -> MemberProfile {
        let mut profile = h
            .members
            .create(&CreateMemberProfile::from_token_data(
                subject_id,
                &format!("{subject_id}@example.edu"),
                "Student",
            ))
            .await
            .unwrap();
        profile
            .record_upload("https://cdn/id.png".into(), Utc::now())
            .unwrap();
        h.members.insert_row(profile.clone());
        profile
    }

    fn member_ctx() -> RequestContext {
        RequestContext::new(ResolvedIdentity::Member(MemberProfile {
            subject_id: "intruder".to_string(),
            display_id: None,
            email: "x@example.edu".to_string(),
            name: "X".to_string(),
            mobile: None,
            department: None,
            semester: None,
            role: "member".to_string(),
            suspended: false,
            suspended_at: None,
            profile_completed: false,
            id_proof_url: None,
            id_proof_status: VerificationStatus::NotUploaded,
            id_proof_rejection_reason: None,
            id_proof_uploaded_at: None,
            id_proof_verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    }

    #[tokio::test]
    async fn test_approve_pending_document() {
        let h = harness();
        seed_pending_member(&h, "s1").await;

        let updated = h
            .service
            .verify_id_proof(&operator_ctx(), "s1", true, None)
            .await
            .unwrap();

        assert_eq!(updated.id_proof_status, VerificationStatus::Verified);
        assert!(updated.id_proof_rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_reject_with_reason() {
        let h = harness();
        seed_pending_member(&h, "s1").await;

        let updated = h
            .service
            .verify_id_proof(&operator_ctx(), "s1", false, Some("unreadable scan"))
            .await
            .unwrap();

        assert_eq!(updated.id_proof_status, VerificationStatus::Rejected);
        assert_eq!(
            updated.id_proof_rejection_reason.as_deref(),
            Some("unreadable scan")
        );
    }

    #[tokio::test]
    async fn test_reject_with_empty_reason_is_validation_error() {
        let h = harness();
        seed_pending_member(&h, "s1").await;

        let err = h
            .service
            .verify_id_proof(&operator_ctx(), "s1", false, Some("   "))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        // No state transition happened.
        let profile = h.members.find_by_subject_id("s1").await.unwrap().unwrap();
        assert_eq!(profile.id_proof_status, VerificationStatus::Pending);
        assert!(profile.id_proof_rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_verify_requires_operator() {
        let h = harness();
        seed_pending_member(&h, "s1").await;

        let err = h
            .service
            .verify_id_proof(&member_ctx(), "s1", true, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthorized);
    }

    #[tokio::test]
    async fn test_concurrent_decision_is_conflict() {
        let h = harness();
        let pending = seed_pending_member(&h, "s1").await;

        // First operator approves.
        h.service
            .verify_id_proof(&operator_ctx(), "s1", true, None)
            .await
            .unwrap();

        // A second decision computed from the stale Pending snapshot
        // loses the compare-and-set and must not overwrite.
        let mut stale = pending.clone();
        let expected = stale.id_proof_status;
        stale
            .reject_id_proof("late decision", Utc::now())
            .unwrap();
        let err = h
            .members
            .update_verification_state(&stale, expected)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let profile = h.members.find_by_subject_id("s1").await.unwrap().unwrap();
        assert_eq!(profile.id_proof_status, VerificationStatus::Verified);
    }

    #[tokio::test]
    async fn test_suspension_invalidates_tokens() {
        let h = harness();
        seed_pending_member(&h, "s1").await;
        h.provider
            .register_account("s1", "s1@example.edu", "pw", "Student");
        h.provider
            .issue_token("s1", Utc::now() + chrono::Duration::hours(1));
        assert!(h.provider.has_tokens_for("s1"));

        let updated = h
            .service
            .set_suspension(&operator_ctx(), "s1", true)
            .await
            .unwrap();

        assert!(updated.suspended);
        assert!(updated.suspended_at.is_some());
        assert!(!h.provider.has_tokens_for("s1"));

        let updated = h
            .service
            .set_suspension(&operator_ctx(), "s1", false)
            .await
            .unwrap();
        assert!(!updated.suspended);
        assert!(updated.suspended_at.is_none());
    }

    #[tokio::test]
    async fn test_member_detail_falls_back_to_display_id() {
        let h = harness();
        seed_pending_member(&h, "s1").await;
        h.members
            .complete_profile(
                "s1",
                &libhub_entity::member::ProfileCompletion {
                    mobile: "5550001".to_string(),
                    department: "CSE".to_string(),
                    semester: Some(3),
                },
                "CSE001",
            )
            .await
            .unwrap();

        let detail = h
            .service
            .member_detail(&operator_ctx(), "CSE001")
            .await
            .unwrap();
        assert_eq!(detail.profile.subject_id, "s1");
    }

    #[tokio::test]
    async fn test_analytics_counts() {
        let h = harness();
        seed_pending_member(&h, "s1").await;
        seed_pending_member(&h, "s2").await;
        h.service
            .set_suspension(&operator_ctx(), "s2", true)
            .await
            .unwrap();

        let analytics = h.service.member_analytics(&operator_ctx()).await.unwrap();
        assert_eq!(analytics.total_members, 2);
        assert_eq!(analytics.pending_verifications, 2);
        assert_eq!(analytics.suspended_members, 1);
        assert_eq!(analytics.active_members, 1);
    }
}
