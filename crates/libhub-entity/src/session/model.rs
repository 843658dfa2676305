//! Session record entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An append-only audit record of one login/logout pair.
///
/// Created at logout time only. The login timestamp is supplied by the
/// caller (captured client-side when login succeeded) so that a crash
/// between login and logout never fabricates a record. Never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Provider subject id of the member.
    pub subject_id: String,
    /// Member display id at close time.
    pub display_id: Option<String>,
    /// Member name at close time.
    pub name: String,
    /// Member department at close time.
    pub department: Option<String>,
    /// When the session began (caller-supplied).
    pub login_time: DateTime<Utc>,
    /// When the session ended.
    pub logout_time: DateTime<Utc>,
    /// Elapsed whole seconds between login and logout.
    pub duration_seconds: i64,
    /// Calendar date of the logout, for daily reporting.
    pub date: NaiveDate,
    /// When the record was persisted.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a new session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRecord {
    /// Provider subject id.
    pub subject_id: String,
    /// Member display id snapshot.
    pub display_id: Option<String>,
    /// Member name snapshot.
    pub name: String,
    /// Member department snapshot.
    pub department: Option<String>,
    /// Caller-supplied login timestamp.
    pub login_time: DateTime<Utc>,
    /// Logout timestamp.
    pub logout_time: DateTime<Utc>,
    /// Elapsed whole seconds.
    pub duration_seconds: i64,
    /// Calendar date of the logout.
    pub date: NaiveDate,
}

/// Compute the session duration in whole seconds, rounded down.
///
/// A logout timestamp earlier than the login timestamp (client clock skew)
/// clamps to zero rather than producing a negative duration.
pub fn session_duration_seconds(login: DateTime<Utc>, logout: DateTime<Utc>) -> i64 {
    (logout - login).num_seconds().max(0)
}
