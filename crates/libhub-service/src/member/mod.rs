//! Member self-service.

pub mod service;

pub use service::MemberService;
