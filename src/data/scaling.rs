//! Turning a rotation curve into one `(R, D_eff)` scaling point.
//!
//! The characteristic scale is the outermost measured radius and the
//! characteristic velocity is the observed velocity there, so
//! `D_eff = R_max · v_obs(R_max)` in kpc·km/s.

use crate::domain::{RotationCurve, ScalingPoint};
use crate::error::AnalysisError;

/// Derive the scaling point of one galaxy.
///
/// Only samples with `r > 0` and `v_obs > 0` count; fewer than `min_points`
/// of them is `InsufficientData`.
pub fn scaling_point(
    curve: &RotationCurve,
    min_points: usize,
) -> Result<ScalingPoint, AnalysisError> {
    let positive: Vec<_> = curve
        .samples
        .iter()
        .filter(|s| s.radius.is_finite() && s.radius > 0.0 && s.v_obs.is_finite() && s.v_obs > 0.0)
        .collect();

    let required = min_points.max(1);
    if positive.len() < required {
        return Err(AnalysisError::insufficient("scaling point", required, positive.len()));
    }

    let outer = positive
        .iter()
        .max_by(|a, b| a.radius.total_cmp(&b.radius))
        .ok_or_else(|| AnalysisError::insufficient("scaling point", required, 0))?;

    Ok(ScalingPoint::from_velocity(
        curve.name.clone(),
        outer.radius,
        outer.v_obs,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RotationCurveSample;

    fn curve(points: &[(f64, f64)]) -> RotationCurve {
        RotationCurve::new(
            "NGC0000",
            points
                .iter()
                .map(|&(r, v)| RotationCurveSample::new(r, v, 3.0))
                .collect(),
        )
    }

    #[test]
    fn uses_outermost_radius() {
        let c = curve(&[(0.5, 40.0), (1.0, 70.0), (2.0, 90.0), (4.0, 110.0), (8.0, 120.0)]);
        let p = scaling_point(&c, 5).unwrap();
        assert_eq!(p.label, "NGC0000");
        assert_eq!(p.r, 8.0);
        assert_eq!(p.d_eff, 960.0);
    }

    #[test]
    fn non_positive_samples_do_not_count() {
        let c = curve(&[(0.0, 40.0), (1.0, 0.0), (2.0, 90.0), (4.0, 110.0), (8.0, 120.0)]);
        assert_eq!(
            scaling_point(&c, 5).unwrap_err(),
            AnalysisError::InsufficientData {
                context: "scaling point",
                required: 5,
                available: 3
            }
        );
        assert!(scaling_point(&c, 3).is_ok());
    }
}
