//! Dataset derivation and generation.
//!
//! - per-galaxy scaling points (`scaling`)
//! - reference large-scale structures (`reference`)
//! - synthetic rotation curves for demos and tests (`synthetic`)

pub mod reference;
pub mod scaling;
pub mod synthetic;

pub use reference::*;
pub use scaling::*;
pub use synthetic::*;
