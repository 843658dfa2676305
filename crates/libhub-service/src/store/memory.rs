//! In-memory session, catalog, and purchase stores used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::book::Book;
use libhub_entity::purchase::PurchaseHistoryEntry;
use libhub_entity::session::{CreateSessionRecord, SessionRecord};

use super::{BookStore, PurchaseStore, SessionStore};

/// Session ledger over a `Vec`, append-only like the real table.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    records: Mutex<Vec<SessionRecord>>,
    unavailable: AtomicBool,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended so far.
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Make every operation fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, data: &CreateSessionRecord) -> AppResult<SessionRecord> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("Session store unavailable"));
        }

        let record = SessionRecord {
            id: Uuid::new_v4(),
            subject_id: data.subject_id.clone(),
            display_id: data.display_id.clone(),
            name: data.name.clone(),
            department: data.department.clone(),
            login_time: data.login_time,
            logout_time: data.logout_time,
            duration_seconds: data.duration_seconds,
            date: data.date,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn history_for_subject(
        &self,
        subject_id: &str,
        limit: i64,
    ) -> AppResult<Vec<SessionRecord>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("Session store unavailable"));
        }

        let mut records: Vec<SessionRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.login_time.cmp(&a.login_time));
        records.truncate(limit as usize);
        Ok(records)
    }
}

/// Catalog store over a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    rows: Mutex<HashMap<Uuid, Book>>,
}

impl InMemoryBookStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a book row.
    pub fn insert_row(&self, book: Book) {
        self.rows.lock().unwrap().insert(book.id, book);
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }
}

/// Purchase facts over a `Vec` of (subject, entry) pairs.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseStore {
    rows: Mutex<Vec<(String, PurchaseHistoryEntry)>>,
}

impl InMemoryPurchaseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed purchase fact.
    pub fn insert_row(&self, subject_id: &str, book: &Book, amount: i64) {
        self.rows.lock().unwrap().push((
            subject_id.to_string(),
            PurchaseHistoryEntry {
                book_id: book.id,
                book_title: book.title.clone(),
                amount,
                transaction_id: None,
                purchased_at: Utc::now(),
            },
        ));
    }
}

#[async_trait]
impl PurchaseStore for InMemoryPurchaseStore {
    async fn exists(&self, subject_id: &str, book_id: Uuid) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|(s, e)| s == subject_id && e.book_id == book_id))
    }

    async fn history_for_subject(
        &self,
        subject_id: &str,
    ) -> AppResult<Vec<PurchaseHistoryEntry>> {
        let mut entries: Vec<PurchaseHistoryEntry> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == subject_id)
            .map(|(_, e)| e.clone())
            .collect();
        entries.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        Ok(entries)
    }
}
