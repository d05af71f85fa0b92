//! Bootstrap validation of the power-law exponent.
//!
//! Each resample draws `n` points with replacement from the input and refits.
//! The distribution of refitted exponents gives a mean, a standard deviation
//! and a percentile confidence interval.
//!
//! Reproducibility:
//! - resample `i` owns its own generator, seeded from `(base_seed, i)`
//! - resamples run in parallel but are collected in index order
//! - a seeded run is therefore bit-identical regardless of thread count
//!
//! A draw whose `R` values are all identical cannot be fitted. It is redrawn
//! from the same stream, at most `BootstrapConfig::max_retries` times per
//! resample; `retries` in the result is the total over the run.

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{
    BootstrapConfig, BootstrapResult, IntervalSummary, PowerLawFit, Reproducibility,
    ScalingPoint, DEFAULT_MAX_RETRIES,
};
use crate::error::AnalysisError;
use crate::fit::power_law::{fit_log_log, fit_power_law};
use crate::math::{mean, percentile_sorted, sorted_copy, std_dev};

/// One resample's outcome: the accepted fit (if any) and the rejected draws.
struct Draw {
    fit: Option<(f64, f64)>,
    rejected: usize,
}

/// Run a bootstrap with the default retry budget.
///
/// `rng_seed = Some(s)` gives a bit-reproducible run; `None` draws a base seed
/// from OS entropy.
pub fn bootstrap(
    points: &[ScalingPoint],
    resamples: usize,
    confidence: f64,
    rng_seed: Option<u64>,
) -> Result<BootstrapResult, AnalysisError> {
    bootstrap_with(
        points,
        &BootstrapConfig {
            resamples,
            confidence,
            seed: rng_seed,
            max_retries: DEFAULT_MAX_RETRIES,
        },
    )
}

pub fn bootstrap_with(
    points: &[ScalingPoint],
    config: &BootstrapConfig,
) -> Result<BootstrapResult, AnalysisError> {
    config.validate()?;
    // Domain errors surface here, before any resampling.
    let original = fit_power_law(points)?;

    let (base_seed, reproducibility) = match config.seed {
        Some(seed) => (seed, Reproducibility::Exact { seed }),
        None => (rand::thread_rng().r#gen::<u64>(), Reproducibility::Statistical),
    };

    let log_r: Vec<f64> = points.iter().map(|p| p.r.ln()).collect();
    let log_d: Vec<f64> = points.iter().map(|p| p.d_eff.ln()).collect();

    debug!(
        n = points.len(),
        resamples = config.resamples,
        confidence = config.confidence,
        "bootstrap start"
    );

    let draws: Vec<Draw> = (0..config.resamples)
        .into_par_iter()
        .map(|i| draw_resample(&log_r, &log_d, resample_seed(base_seed, i), config.max_retries))
        .collect();

    let retries: usize = draws.iter().map(|d| d.rejected).sum();
    let completed = draws.iter().filter(|d| d.fit.is_some()).count();
    if completed < config.resamples {
        return Err(AnalysisError::ResamplingExhausted {
            attempts: retries,
            completed,
            requested: config.resamples,
        });
    }

    let (alphas, r2s): (Vec<f64>, Vec<f64>) = draws.iter().filter_map(|d| d.fit).unzip();

    let alpha = summarize(&alphas, config.confidence)?;
    let r_squared = summarize(&r2s, config.confidence)?;
    let bias = alpha.mean - original.alpha;

    info!(
        alpha_mean = alpha.mean,
        alpha_std = alpha.std_dev,
        lower = alpha.lower,
        upper = alpha.upper,
        retries,
        "bootstrap done"
    );

    Ok(BootstrapResult {
        resamples: config.resamples,
        confidence: config.confidence,
        alpha,
        r_squared,
        original,
        bias,
        retries,
        reproducibility,
        alphas,
    })
}

fn draw_resample(log_r: &[f64], log_d: &[f64], seed: u64, max_retries: usize) -> Draw {
    let n = log_r.len();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut xs = vec![0.0; n];
    let mut ys = vec![0.0; n];
    let mut rejected = 0;

    loop {
        for (x, y) in xs.iter_mut().zip(ys.iter_mut()) {
            let j = rng.gen_range(0..n);
            *x = log_r[j];
            *y = log_d[j];
        }
        match fit_log_log(&xs, &ys) {
            Ok(PowerLawFit {
                alpha, r_squared, ..
            }) => {
                return Draw {
                    fit: Some((alpha, r_squared)),
                    rejected,
                };
            }
            Err(_) => {
                rejected += 1;
                if rejected > max_retries {
                    return Draw {
                        fit: None,
                        rejected,
                    };
                }
            }
        }
    }
}

/// SplitMix64 finaliser over `(base, index)` so neighbouring indices get
/// unrelated streams.
fn resample_seed(base: u64, index: usize) -> u64 {
    let step = (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut z = base.wrapping_add(step);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn summarize(values: &[f64], confidence: f64) -> Result<IntervalSummary, AnalysisError> {
    let insufficient = || AnalysisError::insufficient("bootstrap summary", 1, values.len());
    let ddof = if values.len() >= 2 { 1 } else { 0 };
    let sorted = sorted_copy(values);
    let tail = (1.0 - confidence) / 2.0 * 100.0;

    Ok(IntervalSummary {
        mean: mean(values).ok_or_else(insufficient)?,
        std_dev: std_dev(values, ddof).ok_or_else(insufficient)?,
        lower: percentile_sorted(&sorted, tail).ok_or_else(insufficient)?,
        upper: percentile_sorted(&sorted, 100.0 - tail).ok_or_else(insufficient)?,
    })
}
