//! Shared numeric helpers for the error summaries.

use crate::analyzers::error::AnalysisError;
use crate::analyzers::types::ConfidenceResult;

/// Multiplier on the standard deviation for the reported interval, the
/// one-sided 95% point of the normal distribution.
pub const Z_STAR: f64 = 1.65;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Empirical percentile with linear interpolation between order statistics.
/// `pct` is on the 0-100 scale. Returns 0.0 for empty input.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    if low == high {
        return sorted[low];
    }
    sorted[low] + (rank - low as f64) * (sorted[high] - sorted[low])
}

/// Replaces a non-finite value with 0.0. Degenerate zero-volume intersections
/// can push NaN or infinity through the ratio arithmetic; downstream tables
/// always carry finite numbers.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Summarizes one error series as mean, mean ± [`Z_STAR`] standard
/// deviations, and the empirical percentile at `pct`.
pub fn confidence_interval(values: &[f64], pct: f64) -> Result<ConfidenceResult, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyErrorSeries);
    }
    let center = mean(values);
    let spread = stddev(values, center);
    Ok(ConfidenceResult {
        lower: finite_or_zero(center - Z_STAR * spread),
        mean: finite_or_zero(center),
        upper: finite_or_zero(center + Z_STAR * spread),
        percentile: finite_or_zero(percentile(values, pct)),
    })
}
