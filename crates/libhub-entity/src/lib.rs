//! # libhub-entity
//!
//! Domain entity models for LibHub: member and operator profiles, the
//! document-verification lifecycle, session records, and the read-only
//! catalog/purchase views this subsystem consumes.

pub mod book;
pub mod member;
pub mod operator;
pub mod purchase;
pub mod session;
