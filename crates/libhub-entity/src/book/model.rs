//! Book catalog entity model (read-only view).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Visibility tier of a catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "visibility_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VisibilityTier {
    /// Readable by any active member.
    Free,
    /// Gated by verification and purchase state.
    Premium,
}

impl VisibilityTier {
    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for VisibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VisibilityTier {
    type Err = libhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            _ => Err(libhub_core::AppError::validation(format!(
                "Invalid visibility tier: '{s}'. Expected one of: free, premium"
            ))),
        }
    }
}

/// The slice of a catalog book this subsystem reads.
///
/// The catalog owns book metadata and file blobs; access gating only needs
/// the visibility tier, the price, and the targeting fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique book identifier.
    pub id: Uuid,
    /// Title, used for purchase-history display.
    pub title: String,
    /// Visibility tier.
    pub visibility_tier: VisibilityTier,
    /// Price in whole currency units. Zero for free-tier books.
    pub price: i64,
    /// Department the book targets.
    pub department: Option<String>,
    /// Semester the book targets.
    pub semester: Option<String>,
    /// When the book entered the catalog.
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Whether the book requires gating beyond an active account.
    pub fn is_premium(&self) -> bool {
        self.visibility_tier == VisibilityTier::Premium
    }
}
