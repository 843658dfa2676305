//! Purchase record entity model (pre-existing facts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A completed purchase joined with book metadata.
///
/// Payment processing lives elsewhere; this subsystem treats purchase
/// rows as facts when evaluating access and rendering history. At most
/// one row exists per (member, book).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseHistoryEntry {
    /// The purchased book.
    pub book_id: Uuid,
    /// Book title at query time.
    pub book_title: String,
    /// Amount paid, in whole currency units.
    pub amount: i64,
    /// External payment transaction reference.
    pub transaction_id: Option<String>,
    /// When the purchase completed.
    pub purchased_at: DateTime<Utc>,
}
