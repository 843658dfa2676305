//! Operator administration services.

pub mod service;

pub use service::{AdminService, MemberDetail};
