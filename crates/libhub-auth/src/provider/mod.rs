//! Identity provider boundary: contract, HTTP client, verifier, mock.

pub mod http;
pub mod identity;
pub mod mock;
pub mod verifier;

pub use http::HttpIdentityProvider;
pub use identity::{IdentityProvider, ProviderIdentity, ProviderToken};
pub use mock::MockIdentityProvider;
pub use verifier::TokenVerifier;
