//! Profile resolution: identity class discovery and first-login sync.

pub mod resolve;

pub use resolve::{IdentityClass, ProfileResolver, ResolvedIdentity};
