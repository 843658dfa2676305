//! Operator profile entity.

pub mod model;

pub use model::OperatorProfile;
