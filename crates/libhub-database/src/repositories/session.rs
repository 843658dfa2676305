//! Session record repository implementation.

use sqlx::PgPool;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::session::{CreateSessionRecord, SessionRecord};

/// Repository for the append-only session ledger.
///
/// Records are inserted at logout and never updated or deleted.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one session record.
    pub async fn insert(&self, data: &CreateSessionRecord) -> AppResult<SessionRecord> {
        sqlx::query_as::<_, SessionRecord>(
            "INSERT INTO session_records \
             (subject_id, display_id, name, department, login_time, logout_time, \
              duration_seconds, date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(&data.subject_id)
        .bind(&data.display_id)
        .bind(&data.name)
        .bind(&data.department)
        .bind(data.login_time)
        .bind(data.logout_time)
        .bind(data.duration_seconds)
        .bind(data.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to insert session record",
                e,
            )
        })
    }

    /// Most recent session records for one member, newest first.
    pub async fn history_for_subject(
        &self,
        subject_id: &str,
        limit: i64,
    ) -> AppResult<Vec<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>(
            "SELECT * FROM session_records WHERE subject_id = $1 \
             ORDER BY login_time DESC LIMIT $2",
        )
        .bind(subject_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to load session history",
                e,
            )
        })
    }
}
