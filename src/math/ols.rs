//! Least squares solvers.
//!
//! The scaling-law fit is a straight line in log-log space, so the only
//! regression we need is `y = intercept + slope · x`. We still go through a
//! small design matrix and an SVD solve rather than closed-form sums so the
//! same solver handles the (rare) nearly-collinear case gracefully.
//!
//! Implementation choices:
//! - SVD solve on the tall `n × 2` design matrix (nalgebra's `QR::solve` is
//!   intended for square systems).
//! - A zero-variance `x` is rejected up front: SVD would happily return the
//!   minimum-norm solution, which is not a slope.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; `0` when `y` has no variance.
    pub r_squared: f64,
}

/// Ordinary least squares fit of `y` on `x`.
///
/// Returns `None` for fewer than two points, mismatched lengths, non-finite
/// input, or when all `x` are identical (slope undefined).
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let sxx: f64 = x.iter().map(|xi| (xi - x_mean) * (xi - x_mean)).sum();
    if sxx <= f64::EPSILON * x_mean.abs().max(1.0) * n as f64 {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let rhs = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &rhs)?;
    let intercept = beta[0];
    let slope = beta[1];

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let r = yi - (intercept + slope * xi);
        ss_res += r * r;
        ss_tot += (yi - y_mean) * (yi - y_mean);
    }
    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn regression_recovers_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| -1.0 + 0.5 * v).collect();
        let fit = linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept + 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_r_squared_on_noisy_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.5, 0.5, 2.5, 2.5];
        let fit = linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 0.8).abs() < 1e-12);
        assert!((fit.intercept - 0.3).abs() < 1e-12);
        // ss_tot = 4 * 1 = 4, residuals: 0.2, -0.6, 0.6, -0.2 -> ss_res = 0.8
        assert!((fit.r_squared - 0.8).abs() < 1e-12);
    }

    #[test]
    fn regression_rejects_degenerate_x() {
        assert!(linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_regression(&[1.0], &[1.0]).is_none());
        assert!(linear_regression(&[1.0, f64::NAN], &[1.0, 2.0]).is_none());
    }
}
