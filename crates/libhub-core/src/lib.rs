//! # libhub-core
//!
//! Core crate for LibHub, the digital library portal's identity and access
//! service. Contains configuration schemas and the unified error system.
//!
//! This crate has **no** internal dependencies on other LibHub crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
