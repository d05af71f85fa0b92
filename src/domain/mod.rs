//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observational inputs (`RotationCurveSample`, `RotationCurve`, `ScalingPoint`)
//! - the fixed model configuration (`PhysicalConstants`)
//! - computed outputs (`FitResult`, `PhaseMetric`, `PowerLawFit`, `BootstrapResult`)
//! - run-level settings (`RunConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
