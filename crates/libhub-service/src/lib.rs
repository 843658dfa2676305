//! # libhub-service
//!
//! Orchestration services for LibHub: login and logout flows, the
//! append-only session ledger, per-resource access checks, member
//! self-service, and operator administration.

pub mod access;
pub mod admin;
pub mod context;
pub mod login;
pub mod member;
pub mod session;
pub mod store;

pub use context::RequestContext;
