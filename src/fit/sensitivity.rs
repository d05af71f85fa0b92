//! Outlier sensitivity of the power-law exponent.
//!
//! Points are ranked by their absolute log-log residual against the full fit.
//! For `n = 1..=max_removed` the `n` worst points are dropped and the law is
//! refitted, which shows how much the exponent leans on a few points.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{PowerLawFit, ScalingPoint};
use crate::error::AnalysisError;
use crate::fit::power_law::{MIN_FIT_POINTS, fit_power_law};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityStep {
    pub removed: usize,
    pub alpha: f64,
    pub r_squared: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub original: PowerLawFit,
    pub steps: Vec<SensitivityStep>,
}

impl SensitivityReport {
    /// Largest absolute shift of `α` over all steps.
    pub fn max_alpha_shift(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| (s.alpha - self.original.alpha).abs())
            .fold(0.0, f64::max)
    }
}

/// Refit with the `n` largest residuals removed, for `n = 1..=max_removed`.
///
/// Stops early rather than fitting fewer than two points; a step whose
/// remaining `R` values collapse to one distinct value is skipped.
pub fn outlier_sensitivity(
    points: &[ScalingPoint],
    max_removed: usize,
) -> Result<SensitivityReport, AnalysisError> {
    let original = fit_power_law(points)?;

    let mut ranked: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p.d_eff.ln() - original.predict(p.r).ln()).abs()))
        .collect();
    // Worst first; ties keep input order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let limit = max_removed.min(points.len().saturating_sub(MIN_FIT_POINTS));
    let mut steps = Vec::with_capacity(limit);
    for removed in 1..=limit {
        let mut dropped: Vec<usize> = ranked[..removed].iter().map(|(i, _)| *i).collect();
        dropped.sort_unstable();
        let kept: Vec<ScalingPoint> = points
            .iter()
            .enumerate()
            .filter(|(i, _)| dropped.binary_search(i).is_err())
            .map(|(_, p)| p.clone())
            .collect();

        match fit_power_law(&kept) {
            Ok(fit) => steps.push(SensitivityStep {
                removed,
                alpha: fit.alpha,
                r_squared: fit.r_squared,
            }),
            Err(err) => debug!(removed, %err, "sensitivity step skipped"),
        }
    }

    Ok(SensitivityReport { original, steps })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_with_outlier() -> Vec<ScalingPoint> {
        let mut pts: Vec<ScalingPoint> = (1..=6)
            .map(|i| {
                let r = f64::from(i) * 10.0;
                ScalingPoint::new(r, 2.0 * r.powf(1.2))
            })
            .collect();
        pts[2].d_eff *= 20.0;
        pts
    }

    #[test]
    fn removing_the_outlier_restores_the_exponent() {
        let report = outlier_sensitivity(&clean_with_outlier(), 3).unwrap();
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[0].removed, 1);
        assert!((report.steps[0].alpha - 1.2).abs() < 1e-9, "alpha={}", report.steps[0].alpha);
        assert!((report.steps[0].r_squared - 1.0).abs() < 1e-9);
        assert!((report.original.alpha - 1.2).abs() > 1e-3);
        assert!(report.max_alpha_shift() > 1e-3);
    }

    #[test]
    fn never_fits_fewer_than_two_points() {
        let pts = vec![
            ScalingPoint::new(1.0, 1.0),
            ScalingPoint::new(2.0, 3.0),
            ScalingPoint::new(4.0, 7.0),
        ];
        let report = outlier_sensitivity(&pts, 10).unwrap();
        assert_eq!(report.steps.len(), 1);
    }

    #[test]
    fn zero_depth_only_reports_the_original_fit() {
        let report = outlier_sensitivity(&clean_with_outlier(), 0).unwrap();
        assert!(report.steps.is_empty());
        assert_eq!(report.max_alpha_shift(), 0.0);
    }
}
