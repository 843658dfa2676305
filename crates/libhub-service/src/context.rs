//! Request context carrying the resolved identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use libhub_auth::resolver::{IdentityClass, ResolvedIdentity};
use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::member::MemberProfile;
use libhub_entity::operator::OperatorProfile;

/// Context for the current authenticated request.
///
/// Built by the API layer after token verification and profile
/// resolution, and passed into service methods so that every operation
/// knows *who* is acting and in *which* class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The resolved identity (member or operator, with profile).
    pub identity: ResolvedIdentity,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: ResolvedIdentity) -> Self {
        Self {
            identity,
            request_time: Utc::now(),
        }
    }

    /// The provider subject id of the caller.
    pub fn subject_id(&self) -> &str {
        self.identity.subject_id()
    }

    /// The identity class of the caller.
    pub fn class(&self) -> IdentityClass {
        self.identity.class()
    }

    /// The member profile, or `NotAuthorized` for operators.
    pub fn require_member(&self) -> AppResult<&MemberProfile> {
        self.identity
            .as_member()
            .ok_or_else(|| AppError::not_authorized("This action is only available to members"))
    }

    /// The operator profile, or `NotAuthorized` for members.
    pub fn require_operator(&self) -> AppResult<&OperatorProfile> {
        self.identity
            .as_operator()
            .ok_or_else(|| AppError::not_authorized("Operator privileges required"))
    }
}
