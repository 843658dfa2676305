//! Login orchestration.

pub mod service;

pub use service::{LoginOutcome, LoginService};
