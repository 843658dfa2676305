//! Member profile repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::member::{
    CreateMemberProfile, DepartmentCount, MemberAnalytics, MemberFilter, MemberProfile,
    ProfileCompletion, VerificationStatus,
};

/// Repository for member profile lookups and guarded updates.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Create a new member repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a member by provider subject id.
    pub async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<MemberProfile>> {
        sqlx::query_as::<_, MemberProfile>("SELECT * FROM member_profiles WHERE subject_id = $1")
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to find member by subject id",
                    e,
                )
            })
    }

    /// Find a member by the human-readable display id.
    pub async fn find_by_display_id(&self, display_id: &str) -> AppResult<Option<MemberProfile>> {
        sqlx::query_as::<_, MemberProfile>("SELECT * FROM member_profiles WHERE display_id = $1")
            .bind(display_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to find member by display id",
                    e,
                )
            })
    }

    /// Create a new member profile row.
    ///
    /// The unique `subject_id` key is the serialization point for
    /// concurrent first-login synchronization: a duplicate insert fails
    /// with `Conflict`, which callers treat as "already exists, retry
    /// lookup".
    pub async fn create(&self, data: &CreateMemberProfile) -> AppResult<MemberProfile> {
        sqlx::query_as::<_, MemberProfile>(
            "INSERT INTO member_profiles (subject_id, email, name, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&data.subject_id)
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("member_profiles_pkey") =>
            {
                AppError::conflict(format!(
                    "Member profile for subject '{}' already exists",
                    data.subject_id
                ))
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("member_profiles_email_key") =>
            {
                AppError::conflict("Email already in use".to_string())
            }
            _ => AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to create member profile",
                e,
            ),
        })
    }

    /// Write the profile-completion fields and assign the display id.
    pub async fn complete_profile(
        &self,
        subject_id: &str,
        completion: &ProfileCompletion,
        display_id: &str,
    ) -> AppResult<MemberProfile> {
        sqlx::query_as::<_, MemberProfile>(
            "UPDATE member_profiles \
             SET mobile = $2, department = $3, semester = $4, display_id = $5, \
                 profile_completed = TRUE, updated_at = NOW() \
             WHERE subject_id = $1 \
             RETURNING *",
        )
        .bind(subject_id)
        .bind(&completion.mobile)
        .bind(&completion.department)
        .bind(completion.semester)
        .bind(display_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("member_profiles_display_id_key") =>
            {
                AppError::conflict(format!("Display id '{display_id}' already assigned"))
            }
            _ => AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to complete member profile",
                e,
            ),
        })?
        .ok_or_else(|| AppError::not_found(format!("Member {subject_id} not found")))
    }

    /// Persist a verification transition with a compare-and-set guard on
    /// the state the transition was computed from.
    ///
    /// Zero rows updated means another writer moved the profile first;
    /// the caller gets `Conflict` and must re-read.
    pub async fn update_verification_state(
        &self,
        profile: &MemberProfile,
        expected: VerificationStatus,
    ) -> AppResult<MemberProfile> {
        sqlx::query_as::<_, MemberProfile>(
            "UPDATE member_profiles \
             SET id_proof_url = $3, id_proof_status = $4, id_proof_rejection_reason = $5, \
                 id_proof_uploaded_at = $6, id_proof_verified_at = $7, updated_at = $8 \
             WHERE subject_id = $1 AND id_proof_status = $2 \
             RETURNING *",
        )
        .bind(&profile.subject_id)
        .bind(expected)
        .bind(&profile.id_proof_url)
        .bind(profile.id_proof_status)
        .bind(&profile.id_proof_rejection_reason)
        .bind(profile.id_proof_uploaded_at)
        .bind(profile.id_proof_verified_at)
        .bind(profile.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to update verification state",
                e,
            )
        })?
        .ok_or_else(|| {
            AppError::conflict(format!(
                "Verification state for member {} changed concurrently",
                profile.subject_id
            ))
        })
    }

    /// Set or clear the suspension flag.
    pub async fn update_suspension(
        &self,
        subject_id: &str,
        suspended: bool,
        suspended_at: Option<DateTime<Utc>>,
    ) -> AppResult<MemberProfile> {
        sqlx::query_as::<_, MemberProfile>(
            "UPDATE member_profiles \
             SET suspended = $2, suspended_at = $3, updated_at = NOW() \
             WHERE subject_id = $1 \
             RETURNING *",
        )
        .bind(subject_id)
        .bind(suspended)
        .bind(suspended_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to update suspension", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Member {subject_id} not found")))
    }

    /// Count members in a department (drives display-id generation).
    pub async fn count_by_department(&self, department: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM member_profiles WHERE department = $1")
            .bind(department)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to count members by department",
                    e,
                )
            })
    }

    /// List members matching the directory filter, newest first.
    pub async fn list(&self, filter: &MemberFilter) -> AppResult<Vec<MemberProfile>> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{s}%"));

        sqlx::query_as::<_, MemberProfile>(
            "SELECT * FROM member_profiles \
             WHERE ($1::text IS NULL OR department = $1) \
               AND ($2::int IS NULL OR semester = $2) \
               AND ($3::verification_status IS NULL OR id_proof_status = $3) \
               AND ($4::bool IS NULL OR suspended = $4) \
               AND ($5::text IS NULL \
                    OR name ILIKE $5 OR email ILIKE $5 OR display_id ILIKE $5) \
             ORDER BY created_at DESC",
        )
        .bind(&filter.department)
        .bind(filter.semester)
        .bind(filter.verification)
        .bind(filter.suspended)
        .bind(&search_pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list members", e)
        })
    }

    /// Aggregate counters for the operator dashboard.
    pub async fn analytics(&self) -> AppResult<MemberAnalytics> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to count members", e)
            })?;

        let pending: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM member_profiles WHERE id_proof_status = $1")
                .bind(VerificationStatus::Pending)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StoreUnavailable,
                        "Failed to count pending verifications",
                        e,
                    )
                })?;

        let suspended: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM member_profiles WHERE suspended = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StoreUnavailable,
                        "Failed to count suspended members",
                        e,
                    )
                })?;

        let department_distribution = sqlx::query_as::<_, DepartmentCount>(
            "SELECT department, COUNT(*) AS count FROM member_profiles \
             GROUP BY department ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to load department distribution",
                e,
            )
        })?;

        Ok(MemberAnalytics {
            total_members: total,
            pending_verifications: pending,
            suspended_members: suspended,
            active_members: total - suspended,
            department_distribution,
        })
    }
}
