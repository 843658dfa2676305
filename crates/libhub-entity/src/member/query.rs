//! Query and reporting types for the member directory.

use serde::{Deserialize, Serialize};

use super::verification::VerificationStatus;

/// Filters for the operator-facing member directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberFilter {
    /// Restrict to a department code.
    pub department: Option<String>,
    /// Restrict to a semester.
    pub semester: Option<i32>,
    /// Restrict to a verification state.
    pub verification: Option<VerificationStatus>,
    /// Restrict to suspended (`true`) or active (`false`) accounts.
    pub suspended: Option<bool>,
    /// Case-insensitive search over name, email, and display id.
    pub search: Option<String>,
}

/// Aggregate counters for the operator dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAnalytics {
    /// Total member rows.
    pub total_members: i64,
    /// Members with a document awaiting a decision.
    pub pending_verifications: i64,
    /// Currently suspended members.
    pub suspended_members: i64,
    /// Members neither suspended nor deleted (rows are never deleted).
    pub active_members: i64,
    /// Per-department member counts.
    pub department_distribution: Vec<DepartmentCount>,
}

/// One department's share of the member population.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentCount {
    /// Department code, or `None` for members who have not completed
    /// their profile.
    pub department: Option<String>,
    /// Member count.
    pub count: i64,
}
