//! Rotation model implementations.
//!
//! The model is implemented as small, pure functions so that batch code can
//! stay generic over galaxies.

pub mod rotation;

pub use rotation::*;
