//! # libhub-api
//!
//! HTTP API layer for LibHub: Axum routes, the bearer-token extractor,
//! request/response DTOs, middleware, and the error-to-response mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
