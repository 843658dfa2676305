//! Layered access policy for catalog resources.

pub mod engine;

pub use engine::{authorize, AccessReason, Decision};
