//! Cross-scale fitting.
//!
//! Responsibilities:
//!
//! - fit `D_eff = C · R^α` in log-log space
//! - bootstrap the exponent for a confidence interval
//! - measure how much the exponent depends on the worst-fitting points

pub mod bootstrap;
pub mod power_law;
pub mod sensitivity;

pub use bootstrap::*;
pub use power_law::*;
pub use sensitivity::*;
