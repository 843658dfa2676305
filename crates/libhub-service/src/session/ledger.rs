//! The session ledger: duration accounting at logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use libhub_core::result::AppResult;
use libhub_entity::member::MemberProfile;
use libhub_entity::session::{session_duration_seconds, CreateSessionRecord, SessionRecord};

use crate::store::SessionStore;

/// Default page size for session history views.
const HISTORY_LIMIT: i64 = 50;

/// Writes one audit record per logout and serves session history.
///
/// Session open is client-held: the login timestamp travels with the
/// logout call instead of being recorded server-side, so a crash between
/// login and logout never fabricates a record. Each `close` call writes
/// exactly one record; a failed write surfaces to the caller and is never
/// retried here. Preventing duplicate closes for the same login is the
/// caller's job (one in-flight session per subject).
#[derive(Clone)]
pub struct SessionLedger {
    sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLedger").finish()
    }
}

impl SessionLedger {
    /// Creates a new ledger over the session store.
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Close a session: compute the elapsed duration from the
    /// caller-supplied login time and persist one record with a snapshot
    /// of the member's profile fields.
    pub async fn close(
        &self,
        profile: &MemberProfile,
        login_time: DateTime<Utc>,
    ) -> AppResult<SessionRecord> {
        self.close_at(profile, login_time, Utc::now()).await
    }

    /// Close with an explicit logout timestamp.
    pub async fn close_at(
        &self,
        profile: &MemberProfile,
        login_time: DateTime<Utc>,
        logout_time: DateTime<Utc>,
    ) -> AppResult<SessionRecord> {
        let duration_seconds = session_duration_seconds(login_time, logout_time);

        let record = self
            .sessions
            .insert(&CreateSessionRecord {
                subject_id: profile.subject_id.clone(),
                display_id: profile.display_id.clone(),
                name: profile.name.clone(),
                department: profile.department.clone(),
                login_time,
                logout_time,
                duration_seconds,
                date: logout_time.date_naive(),
            })
            .await?;

        info!(
            subject_id = %record.subject_id,
            duration_seconds = record.duration_seconds,
            "Session closed"
        );

        Ok(record)
    }

    /// Most recent session records for one member.
    pub async fn history(&self, subject_id: &str) -> AppResult<Vec<SessionRecord>> {
        self.sessions
            .history_for_subject(subject_id, HISTORY_LIMIT)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySessionStore;
    use chrono::Duration;
    use libhub_core::error::ErrorKind;
    use libhub_entity::member::{VerificationStatus, DEFAULT_MEMBER_ROLE};

    fn member() -> MemberProfile {
        let now = Utc::now();
        MemberProfile {
            subject_id: "s1".to_string(),
            display_id: Some("CSE001".to_string()),
            email: "s1@example.edu".to_string(),
            name: "Student One".to_string(),
            mobile: None,
            department: Some("CSE".to_string()),
            semester: Some(3),
            role: DEFAULT_MEMBER_ROLE.to_string(),
            suspended: false,
            suspended_at: None,
            profile_completed: true,
            id_proof_url: None,
            id_proof_status: VerificationStatus::NotUploaded,
            id_proof_rejection_reason: None,
            id_proof_uploaded_at: None,
            id_proof_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_close_writes_exactly_one_record() {
        let store = Arc::new(InMemorySessionStore::new());
        let ledger = SessionLedger::new(store.clone());

        let t0 = Utc::now() - Duration::seconds(3725);
        let record = ledger
            .close_at(&member(), t0, t0 + Duration::seconds(3725))
            .await
            .unwrap();

        assert_eq!(store.record_count(), 1);
        assert_eq!(record.duration_seconds, 3725);
        assert_eq!(record.subject_id, "s1");
        assert_eq!(record.display_id.as_deref(), Some("CSE001"));
        assert_eq!(record.department.as_deref(), Some("CSE"));
        assert_eq!(record.date, (t0 + Duration::seconds(3725)).date_naive());
    }

    #[tokio::test]
    async fn test_close_snapshot_follows_profile_at_close_time() {
        let store = Arc::new(InMemorySessionStore::new());
        let ledger = SessionLedger::new(store);

        let mut profile = member();
        profile.name = "Renamed Student".to_string();
        profile.department = Some("ECE".to_string());

        let record = ledger
            .close(&profile, Utc::now() - Duration::seconds(10))
            .await
            .unwrap();
        assert_eq!(record.name, "Renamed Student");
        assert_eq!(record.department.as_deref(), Some("ECE"));
    }

    #[tokio::test]
    async fn test_failed_write_surfaces_to_caller() {
        let store = Arc::new(InMemorySessionStore::new());
        store.set_unavailable(true);
        let ledger = SessionLedger::new(store.clone());

        let err = ledger
            .close(&member(), Utc::now() - Duration::seconds(10))
            .await
            .unwrap_err();

        // Not silently dropped, not retried.
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        store.set_unavailable(false);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = Arc::new(InMemorySessionStore::new());
        let ledger = SessionLedger::new(store);
        let profile = member();

        let t0 = Utc::now() - Duration::hours(3);
        ledger
            .close_at(&profile, t0, t0 + Duration::seconds(60))
            .await
            .unwrap();
        let t1 = Utc::now() - Duration::hours(1);
        ledger
            .close_at(&profile, t1, t1 + Duration::seconds(60))
            .await
            .unwrap();

        let history = ledger.history("s1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].login_time, t1);
        assert_eq!(history[1].login_time, t0);
    }
}
