//! Per-resource access checks.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use libhub_auth::policy::{authorize, Decision};
use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::member::MemberProfile;

use crate::store::{BookStore, PurchaseStore};

/// Evaluates the layered gating policy for a member/book pair.
///
/// Loads the book's gating fields and the purchase fact, then delegates
/// to the pure policy engine. A denial is a normal return value; only an
/// unknown book or a store failure is an error.
#[derive(Clone)]
pub struct AccessService {
    books: Arc<dyn BookStore>,
    purchases: Arc<dyn PurchaseStore>,
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService").finish()
    }
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(books: Arc<dyn BookStore>, purchases: Arc<dyn PurchaseStore>) -> Self {
        Self { books, purchases }
    }

    /// Decide whether the member may read the given book.
    pub async fn check(&self, profile: &MemberProfile, book_id: Uuid) -> AppResult<Decision> {
        let book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

        let has_purchase = self
            .purchases
            .exists(&profile.subject_id, book_id)
            .await?;

        let decision = authorize(profile, has_purchase, &book);
        debug!(
            subject_id = %profile.subject_id,
            book_id = %book_id,
            allow = decision.allow,
            reason = %decision.reason,
            "Access decision"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryBookStore, InMemoryPurchaseStore};
    use chrono::Utc;
    use libhub_auth::policy::AccessReason;
    use libhub_core::error::ErrorKind;
    use libhub_entity::book::{Book, VisibilityTier};
    use libhub_entity::member::{VerificationStatus, DEFAULT_MEMBER_ROLE};

    fn member() -> MemberProfile {
        let now = Utc::now();
        MemberProfile {
            subject_id: "s1".to_string(),
            display_id: None,
            email: "s1@example.edu".to_string(),
            name: "Student One".to_string(),
            mobile: None,
            department: None,
            semester: None,
            role: DEFAULT_MEMBER_ROLE.to_string(),
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
        }
    }

    fn premium_book() -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "Premium Title".to_string(),
            visibility_tier: VisibilityTier::Premium,
            price: 199,
            department: None,
            semester: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_book_is_not_found() {
        let service = AccessService::new(
            Arc::new(InMemoryBookStore::new()),
            Arc::new(InMemoryPurchaseStore::new()),
        );

        let err = service
            .check(&member(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_purchase_fact_reaches_policy() {
        let books = Arc::new(InMemoryBookStore::new());
        let purchases = Arc::new(InMemoryPurchaseStore::new());
        let service = AccessService::new(books.clone(), purchases.clone());

        let b1 = premium_book();
        books.insert_row(b1.clone());
        let mut s1 = member();
        s1.record_upload("https://cdn/id.png".into(), Utc::now()).unwrap();
        s1.approve_id_proof(Utc::now()).unwrap();

        let d = service.check(&s1, b1.id).await.unwrap();
        assert_eq!((d.allow, d.reason), (false, AccessReason::PremiumLocked));

        purchases.insert_row("s1", &b1, 199);
        let d = service.check(&s1, b1.id).await.unwrap();
        assert_eq!((d.allow, d.reason), (true, AccessReason::Purchased));
    }

    #[tokio::test]
    async fn test_purchase_of_other_book_does_not_unlock() {
        let books = Arc::new(InMemoryBookStore::new());
        let purchases = Arc::new(InMemoryPurchaseStore::new());
        let service = AccessService::new(books.clone(), purchases.clone());

        let b1 = premium_book();
        let b2 = premium_book();
        books.insert_row(b1.clone());
        books.insert_row(b2.clone());
        purchases.insert_row("s1", &b2, 199);

        let d = service.check(&member(), b1.id).await.unwrap();
        assert_eq!((d.allow, d.reason), (false, AccessReason::MissingIdProof));
    }
}
