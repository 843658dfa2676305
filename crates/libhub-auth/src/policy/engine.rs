//! The access decision function for member/book pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

use libhub_entity::book::Book;
use libhub_entity::member::MemberProfile;

/// Machine-readable reason attached to every access decision.
///
/// Callers branch on the reason to pick a remediation UI: a
/// `missing_id_proof` denial redirects to document upload, a
/// `premium_locked` denial redirects to checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// Denied: the account is suspended.
    Suspended,
    /// Allowed: the book is free-tier.
    FreeTier,
    /// Denied: premium book, unverified identity, no purchase on file.
    MissingIdProof,
    /// Allowed: premium book with a completed purchase.
    Purchased,
    /// Denied: premium book without a purchase.
    PremiumLocked,
}

impl AccessReason {
    /// Return the reason as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suspended => "suspended",
            Self::FreeTier => "free_tier",
            Self::MissingIdProof => "missing_id_proof",
            Self::Purchased => "purchased",
            Self::PremiumLocked => "premium_locked",
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an access evaluation. A denial is a normal return value,
/// never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether access is granted.
    pub allow: bool,
    /// Why.
    pub reason: AccessReason,
}

impl Decision {
    fn allow(reason: AccessReason) -> Self {
        Self {
            allow: true,
            reason,
        }
    }

    fn deny(reason: AccessReason) -> Self {
        Self {
            allow: false,
            reason,
        }
    }
}

/// Evaluate the layered gating policy. First matching rule decides:
///
/// 1. suspended account → deny `suspended`
/// 2. free-tier book → allow `free_tier`
/// 3. premium, unverified, and no purchase of this book → deny
///    `missing_id_proof`
/// 4. premium with a purchase of this book → allow `purchased`
/// 5. otherwise → deny `premium_locked`
///
/// Verification gates commerce, not the reverse: an unverified member
/// without a purchase never reaches the purchase decision. A completed
/// purchase of this specific book, however, survives a later loss of
/// verification — the paid-for content stays readable.
pub fn authorize(profile: &MemberProfile, has_purchase: bool, book: &Book) -> Decision {
    if profile.suspended {
        return Decision::deny(AccessReason::Suspended);
    }

    if !book.is_premium() {
        return Decision::allow(AccessReason::FreeTier);
    }

    if !profile.is_verified() && !has_purchase {
        return Decision::deny(AccessReason::MissingIdProof);
    }

    if has_purchase {
        return Decision::allow(AccessReason::Purchased);
    }

    Decision::deny(AccessReason::PremiumLocked)
}
