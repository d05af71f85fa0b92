//! Mathematical utilities: the acceleration interpolation function, log-log
//! least squares, and summary statistics.

pub mod interp;
pub mod ols;
pub mod stats;

pub use interp::*;
pub use ols::*;
pub use stats::*;
