//! Zero-parameter rotation model evaluation.
//!
//! For every sample we compute:
//! - the baryonic velocity `v_bar² = ML_gas v_gas² + ML_disk v_disk² + ML_bulge v_bulge²`
//! - the Newtonian baryonic acceleration `g_bar = v_bar² / r`
//! - the total acceleration via the fixed interpolation function (`math::interp`)
//! - the predicted velocity `v_pred = sqrt(g_tot · r)`
//!
//! No parameter is fitted: the constants come in once per run and the output is
//! a pure function of `(curve, constants)`.

use tracing::trace;

use crate::domain::{
    AgreementRatio, FitResult, PhysicalConstants, ReducedChiSquared, RotationCurveSample,
};
use crate::error::AnalysisError;
use crate::math::{from_si, mean, std_dev, to_si, total_acceleration};

/// Fewer weighted samples than this make reduced chi-squared `NotComputable`.
const MIN_CHI2_SAMPLES: usize = 2;

/// Squared baryonic velocity, (km/s)².
pub fn baryonic_velocity_sq(sample: &RotationCurveSample, constants: &PhysicalConstants) -> f64 {
    let v2 = constants.ml_gas() * sample.v_gas * sample.v_gas
        + constants.ml_disk() * sample.v_disk * sample.v_disk
        + constants.ml_bulge() * sample.v_bulge * sample.v_bulge;
    v2.max(0.0)
}

/// Baryonic velocity (km/s) for one sample.
pub fn baryonic_velocity(sample: &RotationCurveSample, constants: &PhysicalConstants) -> f64 {
    baryonic_velocity_sq(sample, constants).sqrt()
}

/// Predicted total circular velocity (km/s) at radius `r` (kpc) for a baryonic
/// velocity `v_bar` (km/s).
pub fn predict_velocity(r: f64, v_bar: f64, constants: &PhysicalConstants) -> f64 {
    let g_bar = v_bar * v_bar / r;
    let g_tot = from_si(total_acceleration(to_si(g_bar), constants.a0()));
    (g_tot * r).sqrt()
}

/// Evaluate the model against an observed curve.
///
/// Errors:
/// - `InsufficientData` for an empty curve
/// - `InvalidDomain` for a non-positive or non-finite radius
pub fn evaluate(
    curve: &[RotationCurveSample],
    constants: &PhysicalConstants,
) -> Result<FitResult, AnalysisError> {
    if curve.is_empty() {
        return Err(AnalysisError::insufficient("rotation model evaluation", 1, 0));
    }
    for (idx, s) in curve.iter().enumerate() {
        if !(s.radius.is_finite() && s.radius > 0.0) {
            return Err(AnalysisError::invalid("radius", idx, s.radius));
        }
        if !s.v_obs.is_finite() {
            return Err(AnalysisError::invalid("v_obs", idx, s.v_obs));
        }
    }

    let n = curve.len();
    let mut v_pred = Vec::with_capacity(n);
    let mut v_bar = Vec::with_capacity(n);
    let mut residuals = Vec::with_capacity(n);
    let mut energy_excess = Vec::with_capacity(n);

    for s in curve {
        let vb = baryonic_velocity(s, constants);
        let vp = predict_velocity(s.radius, vb, constants);
        let r = s.v_obs - vp;
        trace!(radius = s.radius, v_obs = s.v_obs, v_bar = vb, v_pred = vp, "sample");
        v_bar.push(vb);
        v_pred.push(vp);
        residuals.push(r);
        energy_excess.push(r.max(0.0));
    }

    let rms = (residuals.iter().map(|r| r * r).sum::<f64>() / n as f64).sqrt();

    // Zero-uncertainty samples carry no weight; no parameters are fitted, so
    // the degrees of freedom are simply the weighted sample count.
    let mut chi_squared = 0.0;
    let mut dof = 0usize;
    for (s, r) in curve.iter().zip(&residuals) {
        if s.v_err > 0.0 && s.v_err.is_finite() {
            chi_squared += (r / s.v_err).powi(2);
            dof += 1;
        }
    }
    let reduced_chi_squared = if dof >= MIN_CHI2_SAMPLES {
        ReducedChiSquared::Computed(chi_squared / dof as f64)
    } else {
        ReducedChiSquared::NotComputable
    };

    let ratios: Vec<f64> = curve
        .iter()
        .zip(&v_pred)
        .filter(|(s, _)| s.v_obs != 0.0)
        .map(|(s, vp)| vp / s.v_obs * 100.0)
        .collect();
    let agreement = match (mean(&ratios), std_dev(&ratios, 0)) {
        (Some(mean_pct), Some(std_pct)) => Some(AgreementRatio {
            mean_pct,
            std_pct,
            n: ratios.len(),
        }),
        _ => None,
    };

    let outer: Vec<f64> = curve
        .iter()
        .zip(&v_pred)
        .skip(n / 2)
        .filter(|(s, _)| s.v_obs != 0.0)
        .map(|(s, vp)| (vp - s.v_obs) / s.v_obs * 100.0)
        .collect();
    let outer_deviation_pct = mean(&outer);

    Ok(FitResult {
        v_pred,
        v_bar,
        residuals,
        energy_excess,
        rms,
        chi_squared,
        dof,
        reduced_chi_squared,
        agreement,
        outer_deviation_pct,
    })
}
