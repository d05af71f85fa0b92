//! Command-line parsing for the rotation-curve analysis tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numeric code. Flags are optional overrides on top of `RunConfig`, which
//! already carries the defaults and the `QICS_*` environment.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "qics", version, about = "Zero-parameter rotation-curve and cross-scale analysis")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `QICS_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate the zero-parameter rotation model against observed curves.
    Evaluate(EvaluateArgs),
    /// Classify every galaxy as Order or Chaos.
    Phase(PhaseArgs),
    /// Derive per-galaxy scaling points and fit the cross-scale power law.
    Scaling(ScalingArgs),
    /// Bootstrap the power-law exponent.
    Bootstrap(BootstrapArgs),
    /// Run every analysis on a synthetic galaxy.
    Demo(DemoArgs),
}

/// Where rotation curves come from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Directory of `*_rotmod.dat` files (default: `QICS_DATA_DIR` or `./data`).
    #[arg(short = 'd', long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct EvaluateArgs {
    /// Rotation-curve files. When empty, every file in the data directory is used.
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Write the per-galaxy table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PhaseArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write `galaxy,n_points,M,phase` to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Also report the Hamiltonian landscape roughness per galaxy.
    #[arg(long)]
    pub landscape: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ScalingArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write `label,R,D_eff` to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Fit galaxies only, without the large-scale reference structures.
    #[arg(long)]
    pub no_reference: bool,

    /// Minimum positive samples for a galaxy to contribute a point.
    #[arg(long)]
    pub min_points: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct BootstrapArgs {
    /// `R,D_eff` CSV table to resample.
    #[arg(long, conflicts_with = "data_dir")]
    pub table: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Number of resamples.
    #[arg(short = 'n', long)]
    pub resamples: Option<usize>,

    /// Two-sided confidence level in (0, 1).
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Seed for a bit-reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the full bootstrap report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Refit with up to K worst-fitting points removed.
    #[arg(long)]
    pub outliers: Option<usize>,

    /// Exclude the reference structures when deriving points from a data directory.
    #[arg(long)]
    pub no_reference: bool,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Seed for the synthetic galaxy and the bootstrap.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of samples in the synthetic curve.
    #[arg(long, default_value_t = 50)]
    pub points: usize,
}
