//! Batch pipeline shared by every command.
//!
//! Each step maps one core operation over a list of galaxies:
//! load -> evaluate / classify / derive scaling points -> pool -> fit
//!
//! Galaxies are processed in parallel and collected in input order. A galaxy
//! that fails a step is kept as an `Err` outcome and logged; the rest of the
//! batch is unaffected.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::{filament_points, scaling_point};
use crate::domain::{
    FitResult, GalaxyOutcome, PhaseMetric, PhysicalConstants, RotationCurve, ScalingPoint,
};
use crate::error::{AnalysisError, AppError};
use crate::io::{discover_rotmod_files, load_rotmod};
use crate::models::evaluate;
use crate::phase::{Landscape, classify, hamiltonian_landscape};

/// Loaded curves plus the files that could not be read.
#[derive(Debug)]
pub struct LoadedBatch {
    pub curves: Vec<RotationCurve>,
    pub failures: Vec<(PathBuf, AppError)>,
}

/// Load every rotmod file in `dir`.
pub fn load_directory(dir: &Path, suffix: &str) -> Result<LoadedBatch, AppError> {
    let files = discover_rotmod_files(dir, suffix)?;
    if files.is_empty() {
        return Err(AppError::new(
            3,
            format!("No '*{suffix}' files found in '{}'.", dir.display()),
        ));
    }
    Ok(load_files(&files))
}

/// Load files in parallel; unreadable files are reported, not fatal.
pub fn load_files(paths: &[PathBuf]) -> LoadedBatch {
    let results: Vec<_> = paths
        .par_iter()
        .map(|p| (p.clone(), load_rotmod(p)))
        .collect();

    let mut curves = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(loaded) => {
                if !loaded.row_errors.is_empty() {
                    warn!(
                        galaxy = %loaded.curve.name,
                        skipped = loaded.row_errors.len(),
                        rows = loaded.rows_read,
                        "skipped malformed rows"
                    );
                }
                curves.push(loaded.curve);
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load rotation curve");
                failures.push((path, err));
            }
        }
    }

    info!(loaded = curves.len(), failed = failures.len(), "rotation curves loaded");
    LoadedBatch { curves, failures }
}

/// Apply `step` to every curve, keeping failures as outcomes.
pub fn run_batch<T, F>(curves: &[RotationCurve], step: &'static str, f: F) -> Vec<GalaxyOutcome<T>>
where
    T: Send,
    F: Fn(&RotationCurve) -> Result<T, AnalysisError> + Sync,
{
    let outcomes: Vec<GalaxyOutcome<T>> = curves
        .par_iter()
        .map(|curve| {
            let result = f(curve);
            match &result {
                Ok(_) => debug!(galaxy = %curve.name, step, "ok"),
                Err(err) => warn!(galaxy = %curve.name, step, %err, "galaxy skipped"),
            }
            GalaxyOutcome {
                name: curve.name.clone(),
                n_points: curve.len(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(step, total = outcomes.len(), failed, "batch complete");
    outcomes
}

/// Rotation model evaluation for every galaxy, under one set of constants.
pub fn evaluate_galaxies(
    curves: &[RotationCurve],
    constants: &PhysicalConstants,
) -> Vec<GalaxyOutcome<FitResult>> {
    run_batch(curves, "evaluate", |c| evaluate(&c.samples, constants))
}

pub fn classify_galaxies(curves: &[RotationCurve]) -> Vec<GalaxyOutcome<PhaseMetric>> {
    run_batch(curves, "phase", |c| classify(&c.samples))
}

pub fn landscape_galaxies(
    curves: &[RotationCurve],
    constants: &PhysicalConstants,
) -> Vec<GalaxyOutcome<Landscape>> {
    run_batch(curves, "landscape", |c| hamiltonian_landscape(&c.samples, constants))
}

pub fn scaling_points(
    curves: &[RotationCurve],
    min_points: usize,
) -> Vec<GalaxyOutcome<ScalingPoint>> {
    run_batch(curves, "scaling point", |c| scaling_point(c, min_points))
}

/// Successful galaxy points, optionally followed by the reference structures.
pub fn pool_scaling_points(
    outcomes: &[GalaxyOutcome<ScalingPoint>],
    include_reference: bool,
) -> Vec<ScalingPoint> {
    let mut points: Vec<ScalingPoint> = outcomes.iter().filter_map(|o| o.ok().cloned()).collect();
    if include_reference {
        points.extend(filament_points());
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mock_galaxy;
    use crate::domain::RotationCurveSample;

    fn batch() -> Vec<RotationCurve> {
        let good = mock_galaxy(30, 1).unwrap();
        let bad = RotationCurve::new("Broken", vec![RotationCurveSample::new(-1.0, 10.0, 1.0)]);
        let other = RotationCurve {
            name: "Other".to_string(),
            ..mock_galaxy(20, 2).unwrap()
        };
        vec![good, bad, other]
    }

    #[test]
    fn one_bad_galaxy_does_not_abort_the_batch() {
        let curves = batch();
        let outcomes = evaluate_galaxies(&curves, &PhysicalConstants::default());
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(AnalysisError::InvalidDomain { .. })));
        assert!(outcomes[2].result.is_ok());
        assert_eq!(outcomes[2].name, "Other");
    }

    #[test]
    fn batch_matches_single_galaxy_calls() {
        let curves = batch();
        let constants = PhysicalConstants::default();
        let outcomes = evaluate_galaxies(&curves, &constants);
        let direct = evaluate(&curves[0].samples, &constants).unwrap();
        assert_eq!(outcomes[0].ok(), Some(&direct));

        let phases = classify_galaxies(&curves);
        assert_eq!(phases[0].ok(), classify(&curves[0].samples).ok().as_ref());
        assert!(phases[1].result.is_err());
    }

    #[test]
    fn pooled_points_include_references_on_request() {
        let curves = batch();
        let outcomes = scaling_points(&curves, 5);
        assert_eq!(pool_scaling_points(&outcomes, false).len(), 2);
        let pooled = pool_scaling_points(&outcomes, true);
        assert_eq!(pooled.len(), 5);
        assert_eq!(pooled[4].label, "Full Filament");
    }
}
