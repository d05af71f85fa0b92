//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numeric code stays free of presentation concerns
//! - output changes are localized

use crate::domain::{
    BootstrapResult, FitResult, GalaxyOutcome, Phase, PhaseMetric, PowerLawFit, Reproducibility,
    ScalingPoint,
};
use crate::fit::SensitivityReport;

/// Per-galaxy model agreement table.
pub fn format_evaluation_table(outcomes: &[GalaxyOutcome<FitResult>]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<14} {:>5} {:>9} {:>10} {:>12} {:>10}\n",
        "galaxy", "n", "rms", "chi2_red", "ratio%", "outer%"
    ));

    for o in outcomes {
        let Some(fit) = o.ok() else { continue };
        let chi2 = fit
            .reduced_chi_squared
            .value()
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "n/a".to_string());
        let ratio = fit
            .agreement
            .map(|a| format!("{:.1}±{:.1}", a.mean_pct, a.std_pct))
            .unwrap_or_else(|| "n/a".to_string());
        let outer = fit
            .outer_deviation_pct
            .map(|v| format!("{v:+.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{:<14} {:>5} {:>9.3} {:>10} {:>12} {:>10}\n",
            truncate(&o.name, 14),
            o.n_points,
            fit.rms,
            chi2,
            ratio,
            outer
        ));
    }

    out.push_str(&format_failures(outcomes));
    out
}

/// Per-galaxy phase table followed by the Order / Chaos tally.
pub fn format_phase_table(outcomes: &[GalaxyOutcome<PhaseMetric>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<14} {:>5} {:>10} {:>7}\n", "galaxy", "n", "M", "phase"));

    let (mut order, mut chaos) = (0usize, 0usize);
    for o in outcomes {
        let Some(m) = o.ok() else { continue };
        match m.phase {
            Phase::Order => order += 1,
            Phase::Chaos => chaos += 1,
        }
        out.push_str(&format!(
            "{:<14} {:>5} {:>10.4} {:>7}\n",
            truncate(&o.name, 14),
            o.n_points,
            m.metric,
            m.phase.display_name()
        ));
    }

    let total = order + chaos;
    if total > 0 {
        out.push_str(&format!(
            "\nOrder: {order} ({:.1}%) | Chaos: {chaos} ({:.1}%)\n",
            100.0 * order as f64 / total as f64,
            100.0 * chaos as f64 / total as f64
        ));
    }
    out.push_str(&format_failures(outcomes));
    out
}

/// Fitted law and dataset extent.
pub fn format_power_law(fit: &PowerLawFit, points: &[ScalingPoint]) -> String {
    let mut out = String::new();
    out.push_str("=== Scaling law D_eff = C · R^α ===\n");
    out.push_str(&format!("Points: n={}", fit.n));
    let r_min = points.iter().map(|p| p.r).fold(f64::INFINITY, f64::min);
    let r_max = points.iter().map(|p| p.r).fold(f64::NEG_INFINITY, f64::max);
    if r_min.is_finite() && r_max.is_finite() && r_min > 0.0 {
        out.push_str(&format!(
            " | R=[{r_min:.3}, {r_max:.1}] kpc | {:.1} decades",
            (r_max / r_min).log10()
        ));
    }
    out.push('\n');
    out.push_str(&format!("α  = {:.4}\n", fit.alpha));
    out.push_str(&format!("C  = {:.4e}\n", fit.constant));
    out.push_str(&format!("R² = {:.4}\n", fit.r_squared));
    out
}

/// Bootstrap statistical summary.
pub fn format_bootstrap(result: &BootstrapResult) -> String {
    let mut out = String::new();
    let pct = result.confidence * 100.0;

    out.push_str("=== Bootstrap validation ===\n");
    out.push_str(&format!("Resamples: {}", result.resamples));
    match result.reproducibility {
        Reproducibility::Exact { seed } => out.push_str(&format!(" (seed={seed})\n")),
        Reproducibility::Statistical => out.push_str(" (unseeded)\n"),
    }
    out.push_str(&format!("Original α: {:.4}\n", result.original.alpha));
    out.push_str(&format!(
        "α  mean={:.4} std={:.4} {pct:.0}% CI=[{:.4}, {:.4}]\n",
        result.alpha.mean, result.alpha.std_dev, result.alpha.lower, result.alpha.upper
    ));
    out.push_str(&format!("Bias: {:+.5}\n", result.bias));
    out.push_str(&format!(
        "R² mean={:.4} std={:.4} {pct:.0}% CI=[{:.4}, {:.4}]\n",
        result.r_squared.mean,
        result.r_squared.std_dev,
        result.r_squared.lower,
        result.r_squared.upper
    ));
    if result.retries > 0 {
        out.push_str(&format!("Redrawn degenerate resamples: {}\n", result.retries));
    }
    out
}

pub fn format_sensitivity(report: &SensitivityReport) -> String {
    let mut out = String::new();
    out.push_str("Outlier sensitivity:\n");
    out.push_str(&format!(
        "  removed=0 α={:.4} R²={:.4}\n",
        report.original.alpha, report.original.r_squared
    ));
    for step in &report.steps {
        out.push_str(&format!(
            "  removed={} α={:.4} R²={:.4} (Δα={:+.4})\n",
            step.removed,
            step.alpha,
            step.r_squared,
            step.alpha - report.original.alpha
        ));
    }
    out
}

/// List of galaxies that failed, with reasons. Empty when all succeeded.
pub fn format_failures<T>(outcomes: &[GalaxyOutcome<T>]) -> String {
    let failed: Vec<_> = outcomes
        .iter()
        .filter_map(|o| o.err().map(|e| (&o.name, e)))
        .collect();
    if failed.is_empty() {
        return String::new();
    }

    let mut out = format!("\nSkipped {} galaxies:\n", failed.len());
    for (name, err) in failed {
        out.push_str(&format!("  {name}: {err}\n"));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
