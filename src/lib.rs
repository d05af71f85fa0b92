//! `qics-dynamics` library crate.
//!
//! The binary (`qics`) is a thin wrapper around this library so that:
//!
//! - the numeric core is testable without spawning processes
//! - the four analyses (rotation model, phase, scaling law, bootstrap) are
//!   reusable from other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod phase;
pub mod report;
