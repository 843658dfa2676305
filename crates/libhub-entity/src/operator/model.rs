//! Operator profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A privileged operator, keyed by the identity provider's subject id.
///
/// The key space is disjoint from member profiles: a subject id exists in
/// at most one of the two stores. Rows are created only through the
/// secret-gated registration path, never by first-login synchronization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OperatorProfile {
    /// Opaque subject id issued by the identity provider. Unique.
    pub subject_id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// When the operator account was registered.
    pub created_at: DateTime<Utc>,
    /// Last successful operator login.
    pub last_login_at: Option<DateTime<Utc>>,
}
