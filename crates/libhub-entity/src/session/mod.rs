//! Session ledger entities.

pub mod model;

pub use model::{session_duration_seconds, CreateSessionRecord, SessionRecord};
