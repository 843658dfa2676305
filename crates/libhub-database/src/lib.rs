//! # libhub-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations for LibHub. Repositories are plain structs over a
//! [`sqlx::PgPool`]; the trait seams they plug into are declared by the
//! consuming crates (`libhub-auth`, `libhub-service`).

pub mod connection;
pub mod migration;
pub mod repositories;
