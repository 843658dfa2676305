//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Provider account email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Provider account password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Requested identity class: `"member"`, `"operator"`, or absent for
    /// role discovery.
    pub requested_class: Option<String>,
}

/// Logout request body. The login timestamp is client-held; see the
/// session ledger contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// When the session began.
    pub login_time: DateTime<Utc>,
}

/// Profile completion request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteProfileRequest {
    /// Mobile number.
    #[validate(length(min = 4, max = 20))]
    pub mobile: String,
    /// Department code.
    #[validate(length(min = 1, max = 16))]
    pub department: String,
    /// Semester number.
    pub semester: Option<i32>,
}

/// Identity-document upload request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadIdProofRequest {
    /// URL of the stored document.
    #[validate(length(min = 1, message = "Document URL is required"))]
    pub url: String,
}

/// Verification decision request (operator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyIdProofRequest {
    /// Approve (`true`) or reject (`false`).
    pub approved: bool,
    /// Mandatory when rejecting.
    pub reason: Option<String>,
}

/// Suspension toggle request (operator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendRequest {
    /// Target suspension state.
    pub suspended: bool,
}

/// Query parameters for the member directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberListQuery {
    /// Department filter.
    pub department: Option<String>,
    /// Semester filter.
    pub semester: Option<i32>,
    /// Verification state filter (`not_uploaded` | `pending` | `verified`
    /// | `rejected`).
    pub verification: Option<String>,
    /// Suspension filter.
    pub suspended: Option<bool>,
    /// Free-text search over name, email, display id.
    pub search: Option<String>,
}
