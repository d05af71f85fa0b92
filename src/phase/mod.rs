//! Phase classification.
//!
//! The phase metric `M` is the population variance of `log(v²/r + ε)` over the
//! samples of one galaxy. Because a uniform velocity rescaling only shifts every
//! log term by the same constant, `M` depends on the curve's shape, not its
//! amplitude.
//!
//! - `M < 0.5`: `Order`
//! - `M ≥ 0.5`: `Chaos`

pub mod landscape;

pub use landscape::*;

use crate::domain::{Phase, PhaseMetric, RotationCurveSample};
use crate::error::AnalysisError;
use crate::math::variance;

/// Guard against `log(0)` for samples with zero velocity.
pub const LOG_EPSILON: f64 = 1e-10;

/// Minimum samples with positive radius.
pub const MIN_PHASE_SAMPLES: usize = 2;

/// Proxy gradient `v_obs² / r`.
fn proxy_gradient(sample: &RotationCurveSample) -> f64 {
    sample.v_obs * sample.v_obs / sample.radius
}

/// Compute the phase metric and label of one curve.
///
/// Samples with a non-positive (or non-finite) radius are skipped; fewer than
/// two remaining samples is `InsufficientData`. A non-finite velocity on a
/// kept sample is `InvalidDomain`.
pub fn classify(curve: &[RotationCurveSample]) -> Result<PhaseMetric, AnalysisError> {
    let mut logs = Vec::with_capacity(curve.len());
    for (idx, s) in curve.iter().enumerate() {
        if !(s.radius.is_finite() && s.radius > 0.0) {
            continue;
        }
        if !s.v_obs.is_finite() {
            return Err(AnalysisError::invalid("v_obs", idx, s.v_obs));
        }
        logs.push((proxy_gradient(s).abs() + LOG_EPSILON).ln());
    }

    if logs.len() < MIN_PHASE_SAMPLES {
        return Err(AnalysisError::insufficient(
            "phase metric",
            MIN_PHASE_SAMPLES,
            logs.len(),
        ));
    }

    let metric = variance(&logs, 0)
        .ok_or_else(|| AnalysisError::insufficient("phase metric", MIN_PHASE_SAMPLES, logs.len()))?;

    Ok(PhaseMetric {
        metric,
        phase: Phase::from_metric(metric),
        n_used: logs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn curve(radii: &[f64], v: &[f64]) -> Vec<RotationCurveSample> {
        radii
            .iter()
            .zip(v)
            .map(|(&r, &v)| RotationCurveSample::new(r, v, 1.0).with_components(0.0, v, 0.0))
            .collect()
    }

    #[test]
    fn flat_curve_metric_matches_hand_computation() {
        // log(2500/r) = log 2500 - k ln 2 for k = 0..3, so the population
        // variance is var(0,1,2,3) · (ln 2)² = 1.25 · (ln 2)² ≈ 0.600566.
        let c = curve(&[1.0, 2.0, 4.0, 8.0], &[50.0; 4]);
        let m = classify(&c).unwrap();
        let expected = 1.25 * std::f64::consts::LN_2.powi(2);
        assert!((m.metric - expected).abs() < 1e-12, "got {}", m.metric);
        assert!((m.metric - 0.600566).abs() < 1e-6);
        assert_eq!(m.phase, Phase::Chaos);
        assert_eq!(m.n_used, 4);
    }

    #[test]
    fn keplerian_like_curve_has_zero_metric() {
        // v ∝ sqrt(r) makes v²/r constant.
        let radii = [1.0, 2.0, 4.0, 8.0];
        let v: Vec<f64> = radii.iter().map(|r: &f64| 30.0 * r.sqrt()).collect();
        let m = classify(&curve(&radii, &v)).unwrap();
        assert!(m.metric.abs() < 1e-12);
        assert_eq!(m.phase, Phase::Order);
    }

    #[test]
    fn non_positive_radii_are_filtered() {
        let c = curve(&[0.0, -1.0, 2.0], &[10.0, 10.0, 10.0]);
        let err = classify(&c).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                context: "phase metric",
                required: 2,
                available: 1
            }
        );

        let c = curve(&[0.0, 1.0, 2.0, 4.0, 8.0], &[99.0, 50.0, 50.0, 50.0, 50.0]);
        let m = classify(&c).unwrap();
        assert_eq!(m.n_used, 4);
        assert!((m.metric - 1.25 * std::f64::consts::LN_2.powi(2)).abs() < 1e-12);
    }

    #[test]
    fn non_finite_velocity_is_rejected() {
        let c = curve(&[1.0, 2.0, 4.0], &[40.0, f64::NAN, 45.0]);
        assert!(matches!(
            classify(&c),
            Err(AnalysisError::InvalidDomain { quantity: "v_obs", index: 1, .. })
        ));
        let c = curve(&[1.0, 2.0, 4.0], &[40.0, 42.0, f64::INFINITY]);
        assert!(matches!(
            classify(&c),
            Err(AnalysisError::InvalidDomain { quantity: "v_obs", index: 2, .. })
        ));
    }

    #[test]
    fn zero_velocity_is_guarded() {
        let c = curve(&[1.0, 2.0], &[0.0, 10.0]);
        let m = classify(&c).unwrap();
        assert!(m.metric.is_finite());
    }

    #[quickcheck]
    fn metric_is_invariant_under_velocity_rescaling(raw: Vec<(u8, u16)>, k: u16) -> TestResult {
        if raw.len() < 2 || k == 0 {
            return TestResult::discard();
        }
        let samples: Vec<RotationCurveSample> = raw
            .iter()
            .map(|&(r, v)| RotationCurveSample::new(f64::from(r) + 1.0, f64::from(v) + 1.0, 1.0))
            .collect();
        let k = f64::from(k) / 64.0 + 0.5;
        let scaled: Vec<RotationCurveSample> = samples
            .iter()
            .map(|s| RotationCurveSample {
                v_obs: s.v_obs * k,
                ..*s
            })
            .collect();

        let a = classify(&samples).unwrap().metric;
        let b = classify(&scaled).unwrap().metric;
        // Only the ε guard breaks exact invariance.
        TestResult::from_bool((a - b).abs() <= 1e-6 * a.abs().max(1.0))
    }
}
