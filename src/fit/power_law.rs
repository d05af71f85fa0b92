//! Cross-scale power-law fit.
//!
//! Given `(R, D_eff)` pairs we fit `D_eff = C · R^α` by ordinary least squares
//! on `ln D_eff` vs `ln R`:
//! - `α` is the slope
//! - `C = exp(intercept)`
//! - `R²` is the coefficient of determination of the log-log regression
//!
//! Non-positive inputs are rejected rather than dropped: a non-positive
//! transport coefficient means something upstream is wrong.

use crate::domain::{PowerLawFit, ScalingPoint};
use crate::error::AnalysisError;
use crate::math::linear_regression;

pub const MIN_FIT_POINTS: usize = 2;

/// Validate the positivity precondition for every point.
pub fn validate_points(points: &[ScalingPoint]) -> Result<(), AnalysisError> {
    for (idx, p) in points.iter().enumerate() {
        if !(p.r.is_finite() && p.r > 0.0) {
            return Err(AnalysisError::invalid("R", idx, p.r));
        }
        if !(p.d_eff.is_finite() && p.d_eff > 0.0) {
            return Err(AnalysisError::invalid("D_eff", idx, p.d_eff));
        }
    }
    Ok(())
}

/// Fit a power law to the dataset.
///
/// Errors:
/// - `InvalidDomain` if any `R` or `D_eff` is non-positive or non-finite
/// - `InsufficientData` for fewer than two points, or fewer than two distinct `R`
pub fn fit_power_law(points: &[ScalingPoint]) -> Result<PowerLawFit, AnalysisError> {
    validate_points(points)?;
    if points.len() < MIN_FIT_POINTS {
        return Err(AnalysisError::insufficient("power-law fit", MIN_FIT_POINTS, points.len()));
    }

    let log_r: Vec<f64> = points.iter().map(|p| p.r.ln()).collect();
    let log_d: Vec<f64> = points.iter().map(|p| p.d_eff.ln()).collect();
    fit_log_log(&log_r, &log_d)
}

/// Fit on already log-transformed coordinates.
///
/// The bootstrap loop calls this directly on resampled log arrays so the
/// transform is paid once per run.
pub(crate) fn fit_log_log(log_r: &[f64], log_d: &[f64]) -> Result<PowerLawFit, AnalysisError> {
    let line = linear_regression(log_r, log_d).ok_or_else(|| {
        AnalysisError::insufficient(
            "power-law fit (distinct R values)",
            MIN_FIT_POINTS,
            distinct_count(log_r),
        )
    })?;

    Ok(PowerLawFit {
        alpha: line.slope,
        constant: line.intercept.exp(),
        intercept: line.intercept,
        r_squared: line.r_squared,
        n: log_r.len(),
    })
}

fn distinct_count(values: &[f64]) -> usize {
    let mut bits: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
    bits.sort_unstable();
    bits.dedup();
    bits.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(alpha: f64, c: f64) -> Vec<ScalingPoint> {
        (0..8)
            .map(|i| {
                let r = 2f64.powi(i);
                ScalingPoint::new(r, c * r.powf(alpha))
            })
            .collect()
    }

    #[test]
    fn recovers_known_exponent() {
        let fit = fit_power_law(&synthetic(1.5, 3.0)).unwrap();
        assert!((fit.alpha - 1.5).abs() < 1e-10, "alpha={}", fit.alpha);
        assert!((fit.constant - 3.0).abs() < 1e-9, "C={}", fit.constant);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.n, 8);
        assert!((fit.predict(10.0) - 3.0 * 10f64.powf(1.5)).abs() < 1e-6);
    }

    #[test]
    fn fit_is_deterministic() {
        let pts = vec![
            ScalingPoint::new(3.0, 100.0),
            ScalingPoint::new(7.0, 450.0),
            ScalingPoint::new(15.0, 1900.0),
            ScalingPoint::new(40.0, 5200.0),
        ];
        let a = fit_power_law(&pts).unwrap();
        let b = fit_power_law(&pts).unwrap();
        assert_eq!(a.alpha.to_bits(), b.alpha.to_bits());
        assert_eq!(a.r_squared.to_bits(), b.r_squared.to_bits());
        assert!(a.r_squared < 1.0 && a.r_squared > 0.9);
    }

    #[test]
    fn negative_radius_is_rejected_not_dropped() {
        let mut pts = synthetic(1.5, 3.0);
        pts.push(ScalingPoint::new(-1.0, 10.0));
        let err = fit_power_law(&pts).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidDomain {
                quantity: "R",
                index: 8,
                value: -1.0
            }
        );
    }

    #[test]
    fn zero_transport_coefficient_is_rejected() {
        let pts = vec![ScalingPoint::new(1.0, 1.0), ScalingPoint::new(2.0, 0.0)];
        assert!(matches!(
            fit_power_law(&pts),
            Err(AnalysisError::InvalidDomain { quantity: "D_eff", index: 1, .. })
        ));
    }

    #[test]
    fn too_few_or_degenerate_points() {
        assert!(matches!(
            fit_power_law(&[ScalingPoint::new(1.0, 1.0)]),
            Err(AnalysisError::InsufficientData { required: 2, available: 1, .. })
        ));
        let same_r = vec![ScalingPoint::new(5.0, 1.0), ScalingPoint::new(5.0, 2.0)];
        assert!(matches!(
            fit_power_law(&same_r),
            Err(AnalysisError::InsufficientData { available: 1, .. })
        ));
    }
}
