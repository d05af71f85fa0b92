//! Synthetic rotation curves.
//!
//! `mock_galaxy` produces an NGC 2403-like curve: an exponential disk, a
//! linearly rising gas component and a saturating observed curve with
//! Gaussian measurement noise. The generator is seeded, so a given
//! `(n, seed)` always yields the same curve.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{RotationCurve, RotationCurveSample};
use crate::error::AnalysisError;

const R_MIN_KPC: f64 = 0.1;
const R_MAX_KPC: f64 = 21.0;
const V_FLAT: f64 = 133.0;
const NOISE_KMS: f64 = 2.0;
const V_ERR: f64 = 5.0;

/// Generate an `n`-sample mock galaxy.
pub fn mock_galaxy(n: usize, seed: u64) -> Result<RotationCurve, AnalysisError> {
    if n == 0 {
        return Err(AnalysisError::insufficient("mock galaxy", 1, 0));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, NOISE_KMS)
        .map_err(|_| AnalysisError::invalid("noise sigma", 0, NOISE_KMS))?;

    let step = if n > 1 {
        (R_MAX_KPC - R_MIN_KPC) / (n - 1) as f64
    } else {
        0.0
    };

    let samples = (0..n)
        .map(|i| {
            let r = R_MIN_KPC + step * i as f64;
            let v_disk = 90.0 * (r / 2.5) * (-r / 7.0).exp();
            let v_gas = 20.0 * r / 10.0;
            let v_obs = V_FLAT * (1.0 - (-r / 3.0).exp()) + noise.sample(&mut rng);
            RotationCurveSample::new(r, v_obs, V_ERR).with_components(v_gas, v_disk, 0.0)
        })
        .collect();

    Ok(RotationCurve::new("NGC2403-mock", samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_is_seeded_and_spans_the_disk() {
        let a = mock_galaxy(50, 42).unwrap();
        let b = mock_galaxy(50, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!((a.samples[0].radius - 0.1).abs() < 1e-12);
        assert!((a.samples[49].radius - 21.0).abs() < 1e-9);
        assert!(a.samples.iter().all(|s| s.v_err == 5.0));

        let c = mock_galaxy(50, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn outer_curve_is_roughly_flat() {
        let g = mock_galaxy(60, 1).unwrap();
        let outer = &g.samples[50..];
        assert!(outer.iter().all(|s| (s.v_obs - 133.0).abs() < 15.0));
    }

    #[test]
    fn empty_mock_is_rejected() {
        assert!(mock_galaxy(0, 1).is_err());
    }
}
