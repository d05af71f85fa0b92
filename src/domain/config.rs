//! Run-level configuration.
//!
//! Precedence (lowest to highest): built-in defaults, environment / `.env`,
//! command-line flags. Physical constants are deliberately not part of this:
//! they are fixed literals (see `PhysicalConstants`).

use std::path::PathBuf;

use crate::error::{AnalysisError, AppError};

pub const DEFAULT_RESAMPLES: usize = 10_000;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_MAX_RETRIES: usize = 1_000;
/// Minimum positive samples for a galaxy to contribute a scaling point.
pub const DEFAULT_MIN_POINTS: usize = 5;
pub const DEFAULT_OUTLIER_DEPTH: usize = 5;
pub const DEFAULT_FILE_SUFFIX: &str = "_rotmod.dat";

/// Bootstrap settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    pub resamples: usize,
    /// Two-sided confidence level in `(0, 1)`.
    pub confidence: f64,
    /// `Some` makes the run bit-reproducible.
    pub seed: Option<u64>,
    /// Redraws allowed for any single resample before the run fails.
    pub max_retries: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            confidence: DEFAULT_CONFIDENCE,
            seed: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl BootstrapConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.resamples == 0 {
            return Err(AnalysisError::invalid("resamples", 0, 0.0));
        }
        if !(self.confidence.is_finite() && self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(AnalysisError::invalid("confidence", 0, self.confidence));
        }
        Ok(())
    }
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub file_suffix: String,
    pub min_points: usize,
    pub include_reference: bool,
    pub outlier_depth: usize,
    pub bootstrap: BootstrapConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            min_points: DEFAULT_MIN_POINTS,
            include_reference: true,
            outlier_depth: DEFAULT_OUTLIER_DEPTH,
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl RunConfig {
    /// Defaults overlaid with `QICS_*` variables (a `.env` file is honoured).
    ///
    /// Unparseable values are reported (exit code 2) rather than ignored.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = RunConfig::default();

        if let Some(dir) = lookup("QICS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(v) = lookup("QICS_RESAMPLES") {
            config.bootstrap.resamples = parse_var("QICS_RESAMPLES", &v)?;
        }
        if let Some(v) = lookup("QICS_CONFIDENCE") {
            config.bootstrap.confidence = parse_var("QICS_CONFIDENCE", &v)?;
        }
        if let Some(v) = lookup("QICS_SEED") {
            config.bootstrap.seed = Some(parse_var("QICS_SEED", &v)?);
        }
        if let Some(v) = lookup("QICS_MIN_POINTS") {
            config.min_points = parse_var("QICS_MIN_POINTS", &v)?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| AppError::new(2, format!("Invalid {key}='{value}': {e}")))
}
