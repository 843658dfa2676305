//! Session, catalog, and purchase store contracts.
//!
//! Counterparts to the profile store traits in `libhub-auth`: the sqlx
//! repositories are the production implementations, [`memory`] backs the
//! tests.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use libhub_core::result::AppResult;
use libhub_entity::book::Book;
use libhub_entity::purchase::PurchaseHistoryEntry;
use libhub_entity::session::{CreateSessionRecord, SessionRecord};

use libhub_database::repositories::{BookRepository, PurchaseRepository, SessionRepository};

pub use memory::{InMemoryBookStore, InMemoryPurchaseStore, InMemorySessionStore};

/// Append-only access to the session ledger.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append one session record.
    async fn insert(&self, data: &CreateSessionRecord) -> AppResult<SessionRecord>;

    /// Most recent records for one member, newest first.
    async fn history_for_subject(
        &self,
        subject_id: &str,
        limit: i64,
    ) -> AppResult<Vec<SessionRecord>>;
}

/// Read-only access to the catalog's gating fields.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Find a book by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
}

/// Read-only access to completed purchase facts.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    /// Whether the member purchased the given book.
    async fn exists(&self, subject_id: &str, book_id: Uuid) -> AppResult<bool>;

    /// Purchase history for one member, newest first.
    async fn history_for_subject(&self, subject_id: &str)
        -> AppResult<Vec<PurchaseHistoryEntry>>;
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, data: &CreateSessionRecord) -> AppResult<SessionRecord> {
        SessionRepository::insert(self, data).await
    }

    async fn history_for_subject(
        &self,
        subject_id: &str,
        limit: i64,
    ) -> AppResult<Vec<SessionRecord>> {
        SessionRepository::history_for_subject(self, subject_id, limit).await
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        BookRepository::find_by_id(self, id).await
    }
}

#[async_trait]
impl PurchaseStore for PurchaseRepository {
    async fn exists(&self, subject_id: &str, book_id: Uuid) -> AppResult<bool> {
        PurchaseRepository::exists(self, subject_id, book_id).await
    }

    async fn history_for_subject(
        &self,
        subject_id: &str,
    ) -> AppResult<Vec<PurchaseHistoryEntry>> {
        PurchaseRepository::history_for_subject(self, subject_id).await
    }
}
