//! Effective Hamiltonian landscape of a rotation curve.
//!
//! The landscape integrates the force excess over baryons along the radius:
//!
//! ```text
//! f(r)  = (v_obs² - v_bar²) / r
//! H(r)  = Σ f · dr            (cumulative)
//! H_n   = (H - min H) / (max H - min H)
//! G     = 1000 · var(dH_n)    (unit-spaced gradient)
//! ```
//!
//! `H_n` is what a presentation layer draws as the polar landscape; `G` is a
//! secondary roughness indicator. The phase label itself always comes from
//! [`super::classify`].

use serde::{Deserialize, Serialize};

use crate::domain::{PhysicalConstants, RotationCurveSample};
use crate::error::AnalysisError;
use crate::math::{gradient_unit, variance};
use crate::models::baryonic_velocity_sq;

const GRADIENT_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landscape {
    pub radius: Vec<f64>,
    /// Normalised cumulative potential in `[0, 1]`.
    pub h_norm: Vec<f64>,
    pub gradient_metric: f64,
}

pub fn hamiltonian_landscape(
    curve: &[RotationCurveSample],
    constants: &PhysicalConstants,
) -> Result<Landscape, AnalysisError> {
    if curve.len() < 2 {
        return Err(AnalysisError::insufficient("hamiltonian landscape", 2, curve.len()));
    }
    for (idx, s) in curve.iter().enumerate() {
        if !(s.radius.is_finite() && s.radius > 0.0) {
            return Err(AnalysisError::invalid("radius", idx, s.radius));
        }
    }

    let radius: Vec<f64> = curve.iter().map(|s| s.radius).collect();
    let force: Vec<f64> = curve
        .iter()
        .map(|s| {
            let f = (s.v_obs * s.v_obs - baryonic_velocity_sq(s, constants)) / s.radius;
            if f.is_finite() { f } else { 0.0 }
        })
        .collect();

    // Index-spaced radial step, matching the unit-spaced landscape gradient.
    let dr = gradient_unit(&radius);

    let mut h = Vec::with_capacity(force.len());
    let mut acc = 0.0;
    for (f, d) in force.iter().zip(&dr) {
        acc += f * d;
        h.push(acc);
    }

    let h_min = h.iter().copied().fold(f64::INFINITY, f64::min);
    let h_max = h.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = h_max - h_min;
    let h_norm: Vec<f64> = if range > 0.0 {
        h.iter().map(|v| (v - h_min) / range).collect()
    } else {
        vec![0.0; h.len()]
    };

    let gradient_metric = variance(&gradient_unit(&h_norm), 0).unwrap_or(0.0) * GRADIENT_SCALE;

    Ok(Landscape {
        radius,
        h_norm,
        gradient_metric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(r: f64, v_obs: f64, v_disk: f64) -> RotationCurveSample {
        RotationCurveSample::new(r, v_obs, 2.0).with_components(0.0, v_disk, 0.0)
    }

    fn gas_only(r: f64, v_obs: f64, v_gas: f64) -> RotationCurveSample {
        RotationCurveSample::new(r, v_obs, 2.0).with_components(v_gas, 0.0, 0.0)
    }

    #[test]
    fn landscape_is_normalised() {
        let curve: Vec<_> = (1..=10)
            .map(|i| sample(i as f64, 100.0 + i as f64, 60.0))
            .collect();
        let l = hamiltonian_landscape(&curve, &PhysicalConstants::default()).unwrap();
        assert_eq!(l.h_norm.len(), 10);
        let min = l.h_norm.iter().copied().fold(f64::INFINITY, f64::min);
        let max = l.h_norm.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min.abs() < 1e-12);
        assert!((max - 1.0).abs() < 1e-12);
        // Positive force excess everywhere: the landscape rises monotonically.
        assert!(l.h_norm.windows(2).all(|w| w[1] >= w[0]));
        assert!(l.gradient_metric.is_finite());
    }

    #[test]
    fn no_force_excess_gives_flat_landscape() {
        // Gas M/L is 1, so v_bar == v_obs exactly.
        let curve: Vec<_> = (1..=5).map(|i| gas_only(i as f64, 80.0, 80.0)).collect();
        let l = hamiltonian_landscape(&curve, &PhysicalConstants::default()).unwrap();
        assert!(l.h_norm.iter().all(|v| *v == 0.0));
        assert_eq!(l.gradient_metric, 0.0);
    }

    #[test]
    fn landscape_requires_two_valid_samples() {
        let c = PhysicalConstants::default();
        assert!(matches!(
            hamiltonian_landscape(&[sample(1.0, 10.0, 5.0)], &c),
            Err(AnalysisError::InsufficientData { .. })
        ));
        assert!(matches!(
            hamiltonian_landscape(&[sample(1.0, 10.0, 5.0), sample(-2.0, 10.0, 5.0)], &c),
            Err(AnalysisError::InvalidDomain { index: 1, .. })
        ));
    }
}
