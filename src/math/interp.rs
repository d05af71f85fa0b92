//! Stable interpolation between baryonic and total acceleration.
//!
//! The zero-parameter model maps baryonic acceleration to total acceleration:
//!
//! - `g_tot(g_bar) = g_bar / (1 - exp(-sqrt(g_bar / a0)))`
//!
//! Numerical notes:
//! - For small `s = sqrt(g_bar / a0)`, `1 - exp(-s)` suffers from catastrophic
//!   cancellation. We use an `expm1`-based form (and a series fallback).
//! - For `g_bar → 0` the analytic limit is `g_tot → sqrt(g_bar * a0)`, and an
//!   exact zero maps to zero instead of `0 / 0`.
//! - For `g_bar ≫ a0` the function approaches `g_tot → g_bar` (Newtonian).

/// kpc → m.
pub const KPC_TO_M: f64 = 3.086e19;

/// km/s → m/s.
pub const KMS_TO_MS: f64 = 1000.0;

/// Threshold on `s` below which we switch to the series form.
const SMALL_S: f64 = 1e-6;

/// Convert an acceleration in (km/s)²/kpc to m/s².
pub fn to_si(g: f64) -> f64 {
    g * (KMS_TO_MS * KMS_TO_MS) / KPC_TO_M
}

/// Convert an acceleration in m/s² to (km/s)²/kpc.
pub fn from_si(g_si: f64) -> f64 {
    g_si * KPC_TO_M / (KMS_TO_MS * KMS_TO_MS)
}

/// Total acceleration for a non-negative baryonic acceleration (same units as `a0`).
pub fn total_acceleration(g_bar: f64, a0: f64) -> f64 {
    if g_bar <= 0.0 {
        return 0.0;
    }

    let s = (g_bar / a0).sqrt();

    if s < SMALL_S {
        // 1 - e^{-s} ≈ s (1 - s/2 + s²/6), and g_bar / s = sqrt(g_bar a0).
        return (g_bar * a0).sqrt() / (1.0 - s / 2.0 + (s * s) / 6.0);
    }

    // 1 - exp(-s) computed as -expm1(-s).
    let denom = -(-s).exp_m1();
    g_bar / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    const A0: f64 = 1.23e-10;

    #[test]
    fn deep_limit_matches_geometric_mean() {
        for &g in &[1e-30, 1e-24, 1e-20, 1e-16] {
            let got = total_acceleration(g, A0);
            let expected = (g * A0).sqrt();
            assert!(
                ((got - expected) / expected).abs() < 1e-3,
                "g_bar={g:e}: got {got:e}, expected {expected:e}"
            );
        }
    }

    #[test]
    fn exact_zero_is_zero() {
        assert_eq!(total_acceleration(0.0, A0), 0.0);
    }

    #[test]
    fn newtonian_limit() {
        for &k in &[1e3, 1e4, 1e6] {
            let g = k * A0;
            let got = total_acceleration(g, A0);
            assert!(((got - g) / g).abs() < 1e-9, "k={k}: got {got:e}");
        }
    }

    #[test]
    fn series_and_closed_form_agree_at_switch() {
        // s = SMALL_S on each side of the switch.
        let below = (SMALL_S * 0.999).powi(2) * A0;
        let above = (SMALL_S * 1.001).powi(2) * A0;
        let closed_below = below / -(-(below / A0).sqrt()).exp_m1();
        assert!(((total_acceleration(below, A0) - closed_below) / closed_below).abs() < 1e-9);
        let series_above = (above * A0).sqrt();
        assert!(((total_acceleration(above, A0) - series_above) / series_above).abs() < 1e-5);
    }

    #[test]
    fn always_at_least_newtonian() {
        for i in -14..-6 {
            let g = 10f64.powi(i);
            assert!(total_acceleration(g, A0) >= g);
        }
    }

    #[test]
    fn unit_round_trip() {
        let g = 1250.0;
        assert!((from_si(to_si(g)) - g).abs() < 1e-9);
        assert!((to_si(1.0) - 3.2404e-14).abs() < 1e-17);
    }
}
