//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during evaluation / fitting
//! - exported to JSON/CSV
//! - handed to an external presentation layer for plotting

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Phase metric threshold separating `Order` from `Chaos`.
///
/// The boundary is closed on the chaos side: `M == 0.5` is `Chaos`.
pub const PHASE_THRESHOLD: f64 = 0.5;

/// One observational record of a rotation curve.
///
/// Velocities are km/s, radius is kpc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationCurveSample {
    pub radius: f64,
    pub v_obs: f64,
    /// Velocity uncertainty; `0` means "no weight" in chi-squared.
    pub v_err: f64,
    pub v_gas: f64,
    pub v_disk: f64,
    pub v_bulge: f64,
}

impl RotationCurveSample {
    /// A sample with no baryonic decomposition.
    pub fn new(radius: f64, v_obs: f64, v_err: f64) -> Self {
        Self {
            radius,
            v_obs,
            v_err,
            v_gas: 0.0,
            v_disk: 0.0,
            v_bulge: 0.0,
        }
    }

    pub fn with_components(mut self, v_gas: f64, v_disk: f64, v_bulge: f64) -> Self {
        self.v_gas = v_gas.abs();
        self.v_disk = v_disk.abs();
        self.v_bulge = v_bulge.abs();
        self
    }
}

/// A named galaxy rotation curve, ordered by increasing radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationCurve {
    pub name: String,
    pub samples: Vec<RotationCurveSample>,
}

impl RotationCurve {
    pub fn new(name: impl Into<String>, mut samples: Vec<RotationCurveSample>) -> Self {
        samples.sort_by(|a, b| {
            a.radius
                .partial_cmp(&b.radius)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Fixed physical constants shared by every galaxy in a run.
///
/// Fields are private and there are no setters: a value is built once (from the
/// literals or the validated constructor) and passed by reference into every
/// evaluation. Nothing in the crate accepts a per-galaxy replacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalConstants {
    a0: f64,
    ml_disk: f64,
    ml_gas: f64,
    ml_bulge: f64,
}

impl PhysicalConstants {
    /// Critical acceleration scale, m/s² (≈ cH₀/2π).
    pub const A0: f64 = 1.23e-10;
    pub const ML_DISK: f64 = 0.5;
    pub const ML_GAS: f64 = 1.0;
    pub const ML_BULGE: f64 = 0.7;

    pub fn new(a0: f64, ml_disk: f64, ml_gas: f64, ml_bulge: f64) -> Result<Self, AnalysisError> {
        let fields = [
            ("a0", a0),
            ("ml_disk", ml_disk),
            ("ml_gas", ml_gas),
            ("ml_bulge", ml_bulge),
        ];
        for (idx, (name, value)) in fields.into_iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::invalid(name, idx, value));
            }
        }
        Ok(Self {
            a0,
            ml_disk,
            ml_gas,
            ml_bulge,
        })
    }

    pub fn a0(&self) -> f64 {
        self.a0
    }

    pub fn ml_disk(&self) -> f64 {
        self.ml_disk
    }

    pub fn ml_gas(&self) -> f64 {
        self.ml_gas
    }

    pub fn ml_bulge(&self) -> f64 {
        self.ml_bulge
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            a0: Self::A0,
            ml_disk: Self::ML_DISK,
            ml_gas: Self::ML_GAS,
            ml_bulge: Self::ML_BULGE,
        }
    }
}

/// Reduced chi-squared, or an explicit "no result" when there are too few
/// weighted samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducedChiSquared {
    Computed(f64),
    NotComputable,
}

impl ReducedChiSquared {
    pub fn value(self) -> Option<f64> {
        match self {
            ReducedChiSquared::Computed(v) => Some(v),
            ReducedChiSquared::NotComputable => None,
        }
    }
}

/// Aggregate of the per-radius `v_pred / v_obs` ratio, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementRatio {
    pub mean_pct: f64,
    pub std_pct: f64,
    /// Number of samples that contributed (those with `v_obs != 0`).
    pub n: usize,
}

/// Output of the rotation model evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Predicted total velocity at each sample radius.
    pub v_pred: Vec<f64>,
    /// Baryonic velocity (M/L weighted quadrature sum) at each radius.
    pub v_bar: Vec<f64>,
    /// `v_obs - v_pred` at each radius.
    pub residuals: Vec<f64>,
    /// `max(0, v_obs - v_pred)` at each radius.
    pub energy_excess: Vec<f64>,
    pub rms: f64,
    pub chi_squared: f64,
    /// Degrees of freedom: weighted sample count (no fitted parameters).
    pub dof: usize,
    pub reduced_chi_squared: ReducedChiSquared,
    pub agreement: Option<AgreementRatio>,
    /// Mean `(v_pred - v_obs) / v_obs` in percent over the outer half of the curve.
    pub outer_deviation_pct: Option<f64>,
}

/// Dynamical phase label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Order,
    Chaos,
}

impl Phase {
    /// Label for a metric value (`M < 0.5` is order, everything else chaos).
    pub fn from_metric(metric: f64) -> Self {
        if metric < PHASE_THRESHOLD {
            Phase::Order
        } else {
            Phase::Chaos
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Phase::Order => "Order",
            Phase::Chaos => "Chaos",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Phase metric of one galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetric {
    /// Population variance of `log(v²/r + ε)`.
    pub metric: f64,
    pub phase: Phase,
    /// Samples used (positive radius).
    pub n_used: usize,
}

/// One `(R, D_eff)` pair of the cross-scale dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPoint {
    pub label: String,
    /// Characteristic scale, kpc.
    pub r: f64,
    /// Transport coefficient, kpc·km/s.
    pub d_eff: f64,
}

impl ScalingPoint {
    pub fn new(r: f64, d_eff: f64) -> Self {
        Self {
            label: String::new(),
            r,
            d_eff,
        }
    }

    pub fn labelled(label: impl Into<String>, r: f64, d_eff: f64) -> Self {
        Self {
            label: label.into(),
            r,
            d_eff,
        }
    }

    /// `D_eff = R × V`.
    pub fn from_velocity(label: impl Into<String>, r: f64, v: f64) -> Self {
        Self::labelled(label, r, r * v)
    }
}

/// `D_eff = constant × R^alpha`, fitted in log-log space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    pub alpha: f64,
    /// `exp(intercept)` of the natural-log regression.
    pub constant: f64,
    pub intercept: f64,
    /// Coefficient of determination in log-log space.
    pub r_squared: f64,
    pub n: usize,
}

impl PowerLawFit {
    pub fn predict(&self, r: f64) -> f64 {
        self.constant * r.powf(self.alpha)
    }
}

/// Mean / spread / percentile interval of a resampled statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Whether a bootstrap run can be replayed bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Reproducibility {
    /// Seeded run: same inputs and seed give identical results.
    Exact { seed: u64 },
    /// Entropy-seeded run: only statistically reproducible.
    Statistical,
}

/// Output of one bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    pub resamples: usize,
    pub confidence: f64,
    pub alpha: IntervalSummary,
    pub r_squared: IntervalSummary,
    /// Direct fit on the full dataset.
    pub original: PowerLawFit,
    /// `alpha.mean - original.alpha`.
    pub bias: f64,
    /// Draws rejected by the fitter and redrawn.
    pub retries: usize,
    pub reproducibility: Reproducibility,
    /// Resampled exponents, in resample order.
    pub alphas: Vec<f64>,
}

/// Per-galaxy result of a batch step. A failure is kept alongside the
/// successes instead of aborting the run.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyOutcome<T> {
    pub name: String,
    pub n_points: usize,
    pub result: Result<T, AnalysisError>,
}

impl<T> GalaxyOutcome<T> {
    pub fn ok(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn err(&self) -> Option<&AnalysisError> {
        self.result.as_ref().err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_threshold_tie_goes_to_chaos() {
        assert_eq!(Phase::from_metric(0.4999999), Phase::Order);
        assert_eq!(Phase::from_metric(PHASE_THRESHOLD), Phase::Chaos);
        assert_eq!(Phase::from_metric(2.0), Phase::Chaos);
    }

    #[test]
    fn constants_reject_non_positive_values() {
        assert!(PhysicalConstants::new(1.23e-10, 0.5, 1.0, 0.7).is_ok());
        let err = PhysicalConstants::new(0.0, 0.5, 1.0, 0.7).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDomain { quantity: "a0", .. }));
        let err = PhysicalConstants::new(1.23e-10, f64::NAN, 1.0, 0.7).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDomain { quantity: "ml_disk", .. }));
    }

    #[test]
    fn default_constants_are_the_fixed_literals() {
        let c = PhysicalConstants::default();
        assert_eq!(c.a0(), 1.23e-10);
        assert_eq!(c.ml_disk(), 0.5);
        assert_eq!(c.ml_gas(), 1.0);
        assert_eq!(c.ml_bulge(), 0.7);
    }

    #[test]
    fn curve_is_sorted_by_radius() {
        let curve = RotationCurve::new(
            "X",
            vec![
                RotationCurveSample::new(4.0, 10.0, 1.0),
                RotationCurveSample::new(1.0, 5.0, 1.0),
            ],
        );
        assert_eq!(curve.samples[0].radius, 1.0);
        assert_eq!(curve.len(), 2);
    }
}
