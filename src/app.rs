//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves the run configuration
//! - runs the batch pipeline
//! - prints reports and writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{
    BootstrapArgs, Cli, Command, DataArgs, DemoArgs, EvaluateArgs, PhaseArgs, ScalingArgs,
};
use crate::domain::{
    DEFAULT_MIN_POINTS, PhysicalConstants, RotationCurve, RunConfig, ScalingPoint,
};
use crate::error::AppError;
use crate::fit::{bootstrap_with, fit_power_law, outlier_sensitivity};
use crate::io::{create_file, load_scaling_table};
use crate::report;

pub mod pipeline;

/// Entry point for the `qics` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RunConfig::from_env()?;
    // One set of constants for the whole run.
    let constants = PhysicalConstants::default();

    match cli.command {
        Command::Evaluate(args) => handle_evaluate(args, &config, &constants),
        Command::Phase(args) => handle_phase(args, &config, &constants),
        Command::Scaling(args) => handle_scaling(args, config),
        Command::Bootstrap(args) => handle_bootstrap(args, config),
        Command::Demo(args) => handle_demo(args, &constants),
    }
}

/// Logs go to stderr; `QICS_LOG` (or `RUST_LOG`) overrides the `-v` level.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("QICS_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn data_dir<'a>(args: &'a DataArgs, config: &'a RunConfig) -> &'a Path {
    args.data_dir.as_deref().unwrap_or(&config.data_dir)
}

fn handle_evaluate(
    args: EvaluateArgs,
    config: &RunConfig,
    constants: &PhysicalConstants,
) -> Result<(), AppError> {
    let batch = if args.files.is_empty() {
        pipeline::load_directory(data_dir(&args.data, config), &config.file_suffix)?
    } else {
        pipeline::load_files(&args.files)
    };
    if batch.curves.is_empty() {
        return Err(AppError::new(3, "No rotation curves could be loaded."));
    }

    let outcomes = pipeline::evaluate_galaxies(&batch.curves, constants);
    print!("{}", report::format_evaluation_table(&outcomes));

    if let Some(path) = &args.export {
        let rows = crate::io::write_evaluation_csv(create_file(path)?, &outcomes)?;
        info!(path = %path.display(), rows, "evaluation table written");
    }
    Ok(())
}

fn handle_phase(
    args: PhaseArgs,
    config: &RunConfig,
    constants: &PhysicalConstants,
) -> Result<(), AppError> {
    let batch = pipeline::load_directory(data_dir(&args.data, config), &config.file_suffix)?;
    let outcomes = pipeline::classify_galaxies(&batch.curves);
    print!("{}", report::format_phase_table(&outcomes));

    if args.landscape {
        println!("\nLandscape roughness (1000 · var ∇H):");
        for o in pipeline::landscape_galaxies(&batch.curves, constants) {
            if let Some(l) = o.ok() {
                println!("  {:<14} {:>10.4}", o.name, l.gradient_metric);
            }
        }
    }

    if let Some(path) = &args.export {
        let rows = crate::io::write_phase_csv(create_file(path)?, &outcomes)?;
        info!(path = %path.display(), rows, "phase table written");
    }
    Ok(())
}

fn handle_scaling(args: ScalingArgs, mut config: RunConfig) -> Result<(), AppError> {
    if let Some(n) = args.min_points {
        config.min_points = n;
    }
    if args.no_reference {
        config.include_reference = false;
    }

    let dataset = galaxy_scaling_points(data_dir(&args.data, &config), &config)?;
    let points = &dataset.points;
    let fit = fit_power_law(points)?;
    print!("{}", report::format_power_law(&fit, points));

    if let Some(path) = &args.export {
        let phases = pipeline::classify_galaxies(&dataset.curves);
        let rows = crate::io::write_scaling_csv(create_file(path)?, points, &phases)?;
        info!(path = %path.display(), rows, "scaling points written");
    }
    Ok(())
}

fn handle_bootstrap(args: BootstrapArgs, mut config: RunConfig) -> Result<(), AppError> {
    if let Some(n) = args.resamples {
        config.bootstrap.resamples = n;
    }
    if let Some(c) = args.confidence {
        config.bootstrap.confidence = c;
    }
    if args.seed.is_some() {
        config.bootstrap.seed = args.seed;
    }
    if let Some(k) = args.outliers {
        config.outlier_depth = k;
    }
    if args.no_reference {
        config.include_reference = false;
    }

    let points = match &args.table {
        Some(path) => {
            let table = load_scaling_table(path)?;
            for e in &table.row_errors {
                warn!(line = e.line, message = %e.message, "skipped table row");
            }
            table.points
        }
        None => galaxy_scaling_points(data_dir(&args.data, &config), &config)?.points,
    };

    let result = bootstrap_with(&points, &config.bootstrap)?;
    print!("{}", report::format_bootstrap(&result));

    let sensitivity = if config.outlier_depth > 0 {
        let s = outlier_sensitivity(&points, config.outlier_depth)?;
        print!("{}", report::format_sensitivity(&s));
        Some(s)
    } else {
        None
    };

    if let Some(path) = &args.json {
        let out = create_file(path)?;
        crate::io::write_bootstrap_json(out, &points, &result, sensitivity.as_ref())?;
        info!(path = %path.display(), "bootstrap report written");
    }
    Ok(())
}

fn handle_demo(args: DemoArgs, constants: &PhysicalConstants) -> Result<(), AppError> {
    let galaxy = crate::data::mock_galaxy(args.points, args.seed)?;
    let curves = vec![galaxy];

    println!("=== Synthetic galaxy ({} samples, seed={}) ===\n", args.points, args.seed);
    print!("{}", report::format_evaluation_table(&pipeline::evaluate_galaxies(&curves, constants)));
    println!();
    print!("{}", report::format_phase_table(&pipeline::classify_galaxies(&curves)));
    println!();

    let outcomes = pipeline::scaling_points(&curves, DEFAULT_MIN_POINTS);
    let points = pipeline::pool_scaling_points(&outcomes, true);
    let fit = fit_power_law(&points)?;
    print!("{}", report::format_power_law(&fit, &points));
    println!();

    let result = crate::fit::bootstrap(&points, 2_000, 0.95, Some(args.seed))?;
    print!("{}", report::format_bootstrap(&result));
    Ok(())
}

/// Loaded curves and the scaling points pooled from them.
struct ScalingDataset {
    curves: Vec<RotationCurve>,
    points: Vec<ScalingPoint>,
}

/// Per-galaxy scaling points from a directory, pooled per `config`.
fn galaxy_scaling_points(dir: &Path, config: &RunConfig) -> Result<ScalingDataset, AppError> {
    let batch = pipeline::load_directory(dir, &config.file_suffix)?;
    let outcomes = pipeline::scaling_points(&batch.curves, config.min_points);
    print!("{}", report::format_failures(&outcomes));
    let points = pipeline::pool_scaling_points(&outcomes, config.include_reference);
    info!(
        galaxies = outcomes.len() - outcomes.iter().filter(|o| o.result.is_err()).count(),
        total = points.len(),
        "scaling dataset assembled"
    );
    Ok(ScalingDataset {
        curves: batch.curves,
        points,
    })
}
