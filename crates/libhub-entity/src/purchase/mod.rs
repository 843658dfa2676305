//! Purchase record entities.

pub mod model;

pub use model::PurchaseHistoryEntry;
