//! Input parsing.
//!
//! Two formats are understood:
//! - SPARC-style `*_rotmod.dat` rotation curves (whitespace-delimited columns
//!   `Rad Vobs errV Vgas Vdisk Vbul ...`, `#` comments)
//! - `R,D_eff` scaling tables (CSV with a header row)
//!
//! Design goals:
//! - **Row-level validation** (skip malformed rows, but report what happened)
//! - **No physics here**: values that parse are passed through untouched, so
//!   domain checks stay with the computations that own them

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::{RotationCurve, RotationCurveSample, ScalingPoint};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// One parsed rotation curve plus what was skipped along the way.
#[derive(Debug, Clone)]
pub struct LoadedCurve {
    pub curve: RotationCurve,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Parsed scaling table.
#[derive(Debug, Clone)]
pub struct ScalingTable {
    pub points: Vec<ScalingPoint>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Parse a rotmod stream.
///
/// Only radius and observed velocity are required; the uncertainty and the
/// component velocities default to zero when the row is short.
pub fn parse_rotmod<R: BufRead>(reader: R, name: &str) -> Result<LoadedCurve, AppError> {
    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line
            .map_err(|e| AppError::new(2, format!("Failed to read '{name}' line {line_no}: {e}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        rows_read += 1;

        match parse_rotmod_row(trimmed) {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError {
                line: line_no,
                message,
            }),
        }
    }

    let rows_used = samples.len();
    if rows_used == 0 {
        return Err(AppError::new(3, format!("No usable rows in '{name}'.")));
    }

    Ok(LoadedCurve {
        curve: RotationCurve::new(name, samples),
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Open and parse one rotmod file; the galaxy is named after the file.
pub fn load_rotmod(path: &Path) -> Result<LoadedCurve, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;
    parse_rotmod(BufReader::new(file), &galaxy_name(path))
}

/// `NGC2403_rotmod.dat` → `NGC2403`.
pub fn galaxy_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.replace("_rotmod", "")
}

/// List files in `dir` whose names end with `suffix`, sorted by name.
pub fn discover_rotmod_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        AppError::new(2, format!("Failed to read directory '{}': {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::new(2, format!("Failed to list '{}': {e}", dir.display())))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load an `R,D_eff` CSV table. An optional `label` (or `name`) column names
/// each point.
pub fn load_scaling_table(path: &Path) -> Result<ScalingTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_scaling_table(file)
}

pub fn parse_scaling_table<R: std::io::Read>(input: R) -> Result<ScalingTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let r_col = *header_map
        .get("r")
        .ok_or_else(|| AppError::new(2, "Scaling table is missing the 'R' column."))?;
    let d_col = *header_map
        .get("d_eff")
        .ok_or_else(|| AppError::new(2, "Scaling table is missing the 'D_eff' column."))?;
    let label_col = header_map.get("label").or_else(|| header_map.get("name")).copied();

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_field(&record, r_col, "R").and_then(|r| {
            parse_field(&record, d_col, "D_eff").map(|d| (r, d))
        });
        match parsed {
            Ok((r, d_eff)) => {
                let label = label_col
                    .and_then(|c| record.get(c))
                    .unwrap_or_default();
                points.push(ScalingPoint::labelled(label, r, d_eff));
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if points.is_empty() {
        return Err(AppError::new(3, "No valid rows in scaling table."));
    }

    Ok(ScalingTable {
        points,
        row_errors,
        rows_read,
    })
}

fn parse_rotmod_row(line: &str) -> Result<RotationCurveSample, String> {
    let values = line
        .split_whitespace()
        .map(|tok| match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(format!("Non-finite value '{tok}'")),
            Err(_) => Err(format!("Non-numeric value '{tok}'")),
        })
        .collect::<Result<Vec<f64>, String>>()?;

    if values.len() < 2 {
        return Err(format!("Expected at least 2 columns, got {}", values.len()));
    }
    let col = |i: usize| values.get(i).copied().unwrap_or(0.0);

    Ok(RotationCurveSample::new(col(0), col(1), col(2)).with_components(col(3), col(4), col(5)))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn parse_field(record: &StringRecord, col: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(col)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing {name}"))?;
    raw.parse::<f64>()
        .map_err(|_| format!("Invalid {name} '{raw}'"))
}
