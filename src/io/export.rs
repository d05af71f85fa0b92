//! Export results to CSV / JSON.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Only successful galaxies become rows; failures are reported by the
//! caller, never written as placeholder values.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{BootstrapResult, FitResult, GalaxyOutcome, PhaseMetric, ScalingPoint};
use crate::error::AppError;
use crate::fit::SensitivityReport;

#[derive(Serialize)]
struct PhaseRow<'a> {
    galaxy: &'a str,
    n_points: usize,
    #[serde(rename = "M")]
    metric: f64,
    phase: &'static str,
}

#[derive(Serialize)]
struct EvaluationRow<'a> {
    galaxy: &'a str,
    n_points: usize,
    rms: f64,
    chi2_red: Option<f64>,
    ratio_mean_pct: Option<f64>,
    ratio_std_pct: Option<f64>,
    outer_deviation_pct: Option<f64>,
}

#[derive(Serialize)]
struct ScalingRow<'a> {
    label: &'a str,
    #[serde(rename = "R")]
    r: f64,
    #[serde(rename = "D_eff")]
    d_eff: f64,
    /// Phase metric of the galaxy; empty for reference structures.
    #[serde(rename = "M")]
    metric: Option<f64>,
}

/// Bootstrap JSON document.
#[derive(Serialize)]
struct BootstrapReport<'a> {
    generated_at: String,
    points: &'a [ScalingPoint],
    bootstrap: &'a BootstrapResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<&'a SensitivityReport>,
}

pub fn create_file(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

/// `galaxy,n_points,M,phase`
pub fn write_phase_csv<W: Write>(
    out: W,
    outcomes: &[GalaxyOutcome<PhaseMetric>],
) -> Result<usize, AppError> {
    write_rows(
        out,
        outcomes.iter().filter_map(|o| {
            o.ok().map(|m| PhaseRow {
                galaxy: &o.name,
                n_points: o.n_points,
                metric: m.metric,
                phase: m.phase.display_name(),
            })
        }),
    )
}

/// `galaxy,n_points,rms,chi2_red,ratio_mean_pct,ratio_std_pct,outer_deviation_pct`
///
/// `NotComputable` quantities are written as empty cells.
pub fn write_evaluation_csv<W: Write>(
    out: W,
    outcomes: &[GalaxyOutcome<FitResult>],
) -> Result<usize, AppError> {
    write_rows(
        out,
        outcomes.iter().filter_map(|o| {
            o.ok().map(|fit| EvaluationRow {
                galaxy: &o.name,
                n_points: o.n_points,
                rms: fit.rms,
                chi2_red: fit.reduced_chi_squared.value(),
                ratio_mean_pct: fit.agreement.map(|a| a.mean_pct),
                ratio_std_pct: fit.agreement.map(|a| a.std_pct),
                outer_deviation_pct: fit.outer_deviation_pct,
            })
        }),
    )
}

/// `label,R,D_eff,M`
///
/// `M` is joined from `phases` by galaxy name and left empty when the point
/// has no successful phase outcome (reference structures, failed galaxies).
pub fn write_scaling_csv<W: Write>(
    out: W,
    points: &[ScalingPoint],
    phases: &[GalaxyOutcome<PhaseMetric>],
) -> Result<usize, AppError> {
    let metrics: HashMap<&str, f64> = phases
        .iter()
        .filter_map(|o| o.ok().map(|m| (o.name.as_str(), m.metric)))
        .collect();
    write_rows(
        out,
        points.iter().map(|p| ScalingRow {
            label: &p.label,
            r: p.r,
            d_eff: p.d_eff,
            metric: metrics.get(p.label.as_str()).copied(),
        }),
    )
}

/// Pretty-printed JSON with a UTC generation timestamp.
pub fn write_bootstrap_json<W: Write>(
    out: W,
    points: &[ScalingPoint],
    result: &BootstrapResult,
    sensitivity: Option<&SensitivityReport>,
) -> Result<(), AppError> {
    let report = BootstrapReport {
        generated_at: Utc::now().to_rfc3339(),
        points,
        bootstrap: result,
        sensitivity,
    };
    serde_json::to_writer_pretty(out, &report)
        .map_err(|e| AppError::new(2, format!("Failed to write bootstrap JSON: {e}")))
}

fn write_rows<W: Write, T: Serialize>(
    out: W,
    rows: impl Iterator<Item = T>,
) -> Result<usize, AppError> {
    let mut writer = csv::Writer::from_writer(out);
    let mut written = 0usize;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
        written += 1;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(written)
}
