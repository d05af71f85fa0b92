//! Summary statistics over `f64` slices.
//!
//! All helpers return `None` on empty input instead of inventing a value.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom (`0` = population).
///
/// Returns `None` when `values.len() <= ddof`.
pub fn variance(values: &[f64], ddof: usize) -> Option<f64> {
    let n = values.len();
    if n <= ddof {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / (n - ddof) as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    variance(values, ddof).map(f64::sqrt)
}

/// Percentile `q` in `[0, 100]` of already sorted data, linearly interpolating
/// between the two nearest order statistics.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !q.is_finite() {
        return None;
    }
    let q = q.clamp(0.0, 100.0);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Sort a copy of `values` in ascending order (NaNs compare equal).
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Numerical derivative of `y` with respect to `x` (non-uniform spacing).
///
/// Second-order central differences in the interior, first-order one-sided
/// differences at both ends. A single point has zero gradient.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len().min(x.len());
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut out = vec![0.0; n];
            out[0] = (y[1] - y[0]) / (x[1] - x[0]);
            out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
            for i in 1..n - 1 {
                let h_l = x[i] - x[i - 1];
                let h_r = x[i + 1] - x[i];
                out[i] = (h_l * h_l * y[i + 1] - h_r * h_r * y[i - 1]
                    + (h_r * h_r - h_l * h_l) * y[i])
                    / (h_l * h_r * (h_l + h_r));
            }
            out
        }
    }
}

/// [`gradient`] with unit spacing.
pub fn gradient_unit(y: &[f64]) -> Vec<f64> {
    let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
    gradient(y, &x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_population_vs_sample() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((variance(&v, 0).unwrap() - 1.25).abs() < 1e-12);
        assert!((variance(&v, 1).unwrap() - 5.0 / 3.0).abs() < 1e-12);
        assert!(variance(&[1.0], 1).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile_sorted(&sorted, 100.0), Some(5.0));
        assert_eq!(percentile_sorted(&sorted, 50.0), Some(3.0));
        // rank = 0.025 * 4 = 0.1
        let p = percentile_sorted(&sorted, 2.5).unwrap();
        assert!((p - 1.1).abs() < 1e-12);
        let p = percentile_sorted(&sorted, 97.5).unwrap();
        assert!((p - 4.9).abs() < 1e-12);
        assert!(percentile_sorted(&[], 50.0).is_none());
    }

    #[test]
    fn gradient_is_exact_for_quadratics() {
        let x = [0.0, 0.5, 2.0, 3.0, 4.5];
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let g = gradient(&y, &x);
        for i in 1..x.len() - 1 {
            assert!((g[i] - 2.0 * x[i]).abs() < 1e-12, "i={i}: {}", g[i]);
        }
        // One-sided ends are first order.
        assert!((g[0] - 0.5).abs() < 1e-12);
        assert!((g[4] - 7.5).abs() < 1e-12);
    }

    #[test]
    fn gradient_degenerate_lengths() {
        assert!(gradient_unit(&[]).is_empty());
        assert_eq!(gradient_unit(&[3.0]), vec![0.0]);
        assert_eq!(gradient_unit(&[1.0, 3.0]), vec![2.0, 2.0]);
    }
}
