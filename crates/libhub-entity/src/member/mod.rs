//! Member profile entity and verification lifecycle.

pub mod model;
pub mod query;
pub mod verification;

pub use model::{CreateMemberProfile, MemberProfile, ProfileCompletion, DEFAULT_MEMBER_ROLE};
pub use query::{DepartmentCount, MemberAnalytics, MemberFilter};
pub use verification::VerificationStatus;
