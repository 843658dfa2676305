//! Operator profile repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::operator::OperatorProfile;

/// Repository for operator profile lookups.
///
/// Inserts happen only through the secret-gated registration path; there
/// is deliberately no synchronization write here.
#[derive(Debug, Clone)]
pub struct OperatorRepository {
    pool: PgPool,
}

impl OperatorRepository {
    /// Create a new operator repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an operator by provider subject id.
    pub async fn find_by_subject_id(&self, subject_id: &str) -> AppResult<Option<OperatorProfile>> {
        sqlx::query_as::<_, OperatorProfile>(
            "SELECT * FROM operator_profiles WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to find operator by subject id",
                e,
            )
        })
    }

    /// Stamp the last successful operator login.
    pub async fn record_login(&self, subject_id: &str, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE operator_profiles SET last_login_at = $2 WHERE subject_id = $1")
            .bind(subject_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to record operator login",
                    e,
                )
            })?;
        Ok(())
    }
}
