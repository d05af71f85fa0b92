//! Input/output helpers.
//!
//! - rotation-curve and scaling-table ingest (`ingest`)
//! - result exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
