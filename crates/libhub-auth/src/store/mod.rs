//! Profile store contracts.
//!
//! The resolver and the services speak to profile storage through these
//! traits; the sqlx repositories in `libhub-database` are the production
//! implementations, and [`memory`] provides in-process implementations
//! for tests.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use libhub_core::result::AppResult;
use libhub_entity::member::{
    CreateMemberProfile, MemberAnalytics, MemberFilter, MemberProfile, ProfileCompletion,
    VerificationStatus,
};
use libhub_entity::operator::OperatorProfile;

use libhub_database::repositories::{MemberRepository, OperatorRepository};

pub use memory::{InMemoryMemberStore, InMemoryOperatorStore};

/// Keyed access to member profiles.
///
/// `create` must be guarded by a unique constraint on `subject_id`; a
/// duplicate insert fails with `Conflict`, which callers treat as
/// "already exists, retry lookup".
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Find a member by provider subject id.
    async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<MemberProfile>>;

    /// Find a member by display id.
    async fn find_by_display_id(&self, display_id: &str) -> AppResult<Option<MemberProfile>>;

    /// Create a new member profile row.
    async fn create(&self, data: &CreateMemberProfile) -> AppResult<MemberProfile>;

    /// Write profile-completion fields and assign the display id.
    async fn complete_profile(
        &self,
        subject_id: &str,
        completion: &ProfileCompletion,
        display_id: &str,
    ) -> AppResult<MemberProfile>;

    /// Persist a verification transition, compare-and-set against the
    /// state it was computed from.
    async fn update_verification_state(
        &self,
        profile: &MemberProfile,
        expected: VerificationStatus,
    ) -> AppResult<MemberProfile>;

    /// Set or clear the suspension flag.
    async fn update_suspension(
        &self,
        subject_id: &str,
        suspended: bool,
        suspended_at: Option<DateTime<Utc>>,
    ) -> AppResult<MemberProfile>;

    /// Count members in a department.
    async fn count_by_department(&self, department: &str) -> AppResult<i64>;

    /// List members matching the directory filter.
    async fn list(&self, filter: &MemberFilter) -> AppResult<Vec<MemberProfile>>;

    /// Aggregate dashboard counters.
    async fn analytics(&self) -> AppResult<MemberAnalytics>;
}

/// Keyed access to operator profiles. Lookup only; inserts happen through
/// the out-of-scope registration path.
#[async_trait]
pub trait OperatorStore: Send + Sync {
    /// Find an operator by provider subject id.
    async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<OperatorProfile>>;

    /// Stamp the last successful operator login.
    async fn record_login(&self, subject_id: &str, at: DateTime<Utc>) -> AppResult<()>;
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<MemberProfile>> {
        MemberRepository::find_by_subject_id(self, subject_id).await
    }

    async fn find_by_display_id(&self, display_id: &str) -> AppResult<Option<MemberProfile>> {
        MemberRepository::find_by_display_id(self, display_id).await
    }

    async fn create(&self, data: &CreateMemberProfile) -> AppResult<MemberProfile> {
        MemberRepository::create(self, data).await
    }

    async fn complete_profile(
        &self,
        subject_id: &str,
        completion: &ProfileCompletion,
        display_id: &str,
    ) -> AppResult<MemberProfile> {
        MemberRepository::complete_profile(self, subject_id, completion, display_id).await
    }

    async fn update_verification_state(
        &self,
        profile: &MemberProfile,
        expected: VerificationStatus,
    ) -> AppResult<MemberProfile> {
        MemberRepository::update_verification_state(self, profile, expected).await
    }

    async fn update_suspension(
        &self,
        subject_id: &str,
        suspended: bool,
        suspended_at: Option<DateTime<Utc>>,
    ) -> AppResult<MemberProfile> {
        MemberRepository::update_suspension(self, subject_id, suspended, suspended_at).await
    }

    async fn count_by_department(&self, department: &str) -> AppResult<i64> {
        MemberRepository::count_by_department(self, department).await
    }

    async fn list(&self, filter: &MemberFilter) -> AppResult<Vec<MemberProfile>> {
        MemberRepository::list(self, filter).await
    }

    async fn analytics(&self) -> AppResult<MemberAnalytics> {
        MemberRepository::analytics(self).await
    }
}

#[async_trait]
impl OperatorStore for OperatorRepository {
    async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<OperatorProfile>> {
        OperatorRepository::find_by_subject_id(self, subject_id).await
    }

    async fn record_login(&self, subject_id: &str, at: DateTime<Utc>) -> AppResult<()> {
        OperatorRepository::record_login(self, subject_id, at).await
    }
}
