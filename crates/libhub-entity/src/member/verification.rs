//! Document-verification status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a member's identity-document verification.
///
/// Transitions: `NotUploaded → Pending → {Verified, Rejected}`, and
/// `Rejected → Pending` on re-upload. `Verified` leaves only through an
/// explicit operator rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No document has been submitted yet.
    NotUploaded,
    /// A document is awaiting an operator decision.
    Pending,
    /// An operator approved the document.
    Verified,
    /// An operator rejected the document; a reason is stored.
    Rejected,
}

impl VerificationStatus {
    /// Whether a member may (re-)submit a document in this state.
    pub fn can_upload(&self) -> bool {
        matches!(self, Self::NotUploaded | Self::Rejected)
    }

    /// Whether an operator decision (approve/reject) is applicable.
    pub fn awaiting_decision(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotUploaded => "not_uploaded",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = libhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_uploaded" => Ok(Self::NotUploaded),
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            _ => Err(libhub_core::AppError::validation(format!(
                "Invalid verification status: '{s}'. Expected one of: \
                 not_uploaded, pending, verified, rejected"
            ))),
        }
    }
}
