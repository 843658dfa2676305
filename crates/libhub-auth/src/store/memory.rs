//! In-memory profile stores used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::member::{
    CreateMemberProfile, DepartmentCount, MemberAnalytics, MemberFilter, MemberProfile,
    ProfileCompletion, VerificationStatus,
};
use libhub_entity::operator::OperatorProfile;

use super::{MemberStore, OperatorStore};

/// Member store over a `HashMap`, with the same conflict semantics as the
/// PostgreSQL repository: duplicate `subject_id` inserts fail with
/// `Conflict`, and verification updates are compare-and-set.
#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    rows: Mutex<HashMap<String, MemberProfile>>,
    create_calls: AtomicU64,
    unavailable: AtomicBool,
    miss_next_find: AtomicBool,
}

impl InMemoryMemberStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile row directly.
    pub fn insert_row(&self, profile: MemberProfile) {
        self.rows
            .lock()
            .unwrap()
            .insert(profile.subject_id.clone(), profile);
    }

    /// Number of `create` attempts observed.
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Make every operation fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make exactly the next `find_by_subject_id` miss, simulating the
    /// window where a concurrent first login inserts the row between a
    /// reader's lookup and its create attempt.
    pub fn miss_next_find(&self) {
        self.miss_next_find.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("Member store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<MemberProfile>> {
        self.check_available()?;
        if self.miss_next_find.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.rows.lock().unwrap().get(subject_id).cloned())
    }

    async fn find_by_display_id(&self, display_id: &str) -> AppResult<Option<MemberProfile>> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|p| p.display_id.as_deref() == Some(display_id))
            .cloned())
    }

    async fn create(&self, data: &CreateMemberProfile) -> AppResult<MemberProfile> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&data.subject_id) {
            return Err(AppError::conflict(format!(
                "Member profile for subject '{}' already exists",
                data.subject_id
            )));
        }

        let now = Utc::now();
        let profile = MemberProfile {
            subject_id: data.subject_id.clone(),
            display_id: None,
            email: data.email.clone(),
            name: data.name.clone(),
            mobile: None,
            department: None,
            semester: None,
            role: data.role.clone(),
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
        };
        rows.insert(profile.subject_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn complete_profile(
        &self,
        subject_id: &str,
        completion: &ProfileCompletion,
        display_id: &str,
    ) -> AppResult<MemberProfile> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        let profile = rows
            .get_mut(subject_id)
            .ok_or_else(|| AppError::not_found(format!("Member {subject_id} not found")))?;

        profile.mobile = Some(completion.mobile.clone());
        profile.department = Some(completion.department.clone());
        profile.semester = completion.semester;
        profile.display_id = Some(display_id.to_string());
        profile.profile_completed = true;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn update_verification_state(
        &self,
        updated: &MemberProfile,
        expected: VerificationStatus,
    ) -> AppResult<MemberProfile> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        let profile = rows.get_mut(&updated.subject_id).ok_or_else(|| {
            AppError::conflict(format!(
                "Verification state for member {} changed concurrently",
                updated.subject_id
            ))
        })?;

        if profile.id_proof_status != expected {
            return Err(AppError::conflict(format!(
                "Verification state for member {} changed concurrently",
                updated.subject_id
            )));
        }

        profile.id_proof_url = updated.id_proof_url.clone();
        profile.id_proof_status = updated.id_proof_status;
        profile.id_proof_rejection_reason = updated.id_proof_rejection_reason.clone();
        profile.id_proof_uploaded_at = updated.id_proof_uploaded_at;
        profile.id_proof_verified_at = updated.id_proof_verified_at;
        profile.updated_at = updated.updated_at;
        Ok(profile.clone())
    }

    async fn update_suspension(
        &self,
        subject_id: &str,
        suspended: bool,
        suspended_at: Option<DateTime<Utc>>,
    ) -> AppResult<MemberProfile> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        let profile = rows
            .get_mut(subject_id)
            .ok_or_else(|| AppError::not_found(format!("Member {subject_id} not found")))?;

        profile.suspended = suspended;
        profile.suspended_at = suspended_at;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn count_by_department(&self, department: &str) -> AppResult<i64> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.department.as_deref() == Some(department))
            .count() as i64)
    }

    async fn list(&self, filter: &MemberFilter) -> AppResult<Vec<MemberProfile>> {
        self.check_available()?;
        let rows = self.rows.lock().unwrap();
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matches: Vec<MemberProfile> = rows
            .values()
            .filter(|p| {
                filter
                    .department
                    .as_ref()
                    .is_none_or(|d| p.department.as_ref() == Some(d))
                    && filter.semester.is_none_or(|s| p.semester == Some(s))
                    && filter
                        .verification
                        .is_none_or(|v| p.id_proof_status == v)
                    && filter.suspended.is_none_or(|s| p.suspended == s)
                    && search.as_ref().is_none_or(|q| {
                        p.name.to_lowercase().contains(q)
                            || p.email.to_lowercase().contains(q)
                            || p.display_id
                                .as_ref()
                                .is_some_and(|d| d.to_lowercase().contains(q))
                    })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn analytics(&self) -> AppResult<MemberAnalytics> {
        self.check_available()?;
        let rows = self.rows.lock().unwrap();
        let total = rows.len() as i64;
        let pending = rows
            .values()
            .filter(|p| p.id_proof_status == VerificationStatus::Pending)
            .count() as i64;
        let suspended = rows.values().filter(|p| p.suspended).count() as i64;

        let mut by_department: HashMap<Option<String>, i64> = HashMap::new();
        for profile in rows.values() {
            *by_department.entry(profile.department.clone()).or_default() += 1;
        }
        let mut department_distribution: Vec<DepartmentCount> = by_department
            .into_iter()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect();
        department_distribution.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(MemberAnalytics {
            total_members: total,
            pending_verifications: pending,
            suspended_members: suspended,
            active_members: total - suspended,
            department_distribution,
        })
    }
}

/// Operator store over a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryOperatorStore {
    rows: Mutex<HashMap<String, OperatorProfile>>,
}

impl InMemoryOperatorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an operator row directly.
    pub fn insert_row(&self, profile: OperatorProfile) {
        self.rows
            .lock()
            .unwrap()
            .insert(profile.subject_id.clone(), profile);
    }
}

#[async_trait]
impl OperatorStore for InMemoryOperatorStore {
    async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<OperatorProfile>> {
        Ok(self.rows.lock().unwrap().get(subject_id).cloned())
    }

    async fn record_login(&self, subject_id: &str, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(subject_id) {
            row.last_login_at = Some(at);
        }
        Ok(())
    }
}
