//! Purchase record repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::purchase::PurchaseHistoryEntry;

/// Read-only repository over completed purchase facts.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    /// Create a new purchase repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the member has a completed purchase of the given book.
    pub async fn exists(&self, subject_id: &str, book_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE subject_id = $1 AND book_id = $2)",
        )
        .bind(subject_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to check purchase", e)
        })
    }

    /// Purchase history for one member, joined with book titles, newest
    /// first.
    pub async fn history_for_subject(
        &self,
        subject_id: &str,
    ) -> AppResult<Vec<PurchaseHistoryEntry>> {
        sqlx::query_as::<_, PurchaseHistoryEntry>(
            "SELECT p.book_id, b.title AS book_title, p.amount, p.transaction_id, \
                    p.purchased_at \
             FROM purchases p JOIN books b ON b.id = p.book_id \
             WHERE p.subject_id = $1 \
             ORDER BY p.purchased_at DESC",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to load purchase history",
                e,
            )
        })
    }
}
