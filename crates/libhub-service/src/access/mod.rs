//! Resource access evaluation.

pub mod service;

pub use service::AccessService;
