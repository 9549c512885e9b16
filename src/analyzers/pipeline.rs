//! Per-intersection orchestration of the estimation stages.

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::analyzers::annual::true_ratios;
use crate::analyzers::daily::valid_daily_volumes;
use crate::analyzers::error::AnalysisError;
use crate::analyzers::sampler::sample_ratio_errors;
use crate::analyzers::shortterm::extract_short_term;
use crate::analyzers::types::{CountRecord, ErrorRecord, ResultRecord};
use crate::analyzers::utility::confidence_interval;
use crate::config::AnalysisConfig;

/// Everything the run driver keeps from one analyzed intersection.
#[derive(Debug, Clone)]
pub struct IntersectionAnalysis {
    pub result: ResultRecord,
    pub error_rows: Vec<ErrorRecord>,
}

/// Runs the full estimation for one intersection: daily validity filtering,
/// annualization, short-term extraction, error sampling, and confidence
/// summaries.
///
/// `records` must all belong to the named intersection. The caller picks the
/// seed, so repeated runs over the same input reproduce bit-identical tables.
pub fn analyze_intersection(
    name: &str,
    records: &[CountRecord],
    holidays: &HashSet<NaiveDate>,
    config: &AnalysisConfig,
    seed: u64,
) -> Result<IntersectionAnalysis, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::NoRecords);
    }

    // Annualized branch
    let daily = valid_daily_volumes(records, config);
    if daily.is_empty() {
        return Err(AnalysisError::NoValidDays);
    }
    let truth = true_ratios(&daily);

    // Short-term branch works from the raw series
    let short_term = extract_short_term(records, holidays, config);

    let mut rng = StdRng::seed_from_u64(seed);
    let samples = sample_ratio_errors(&short_term, &truth, config, &mut rng)?;

    debug!(
        intersection = name,
        valid_days = daily.len(),
        stc_days = short_term.len(),
        trials = samples.len(),
        "intersection pipeline complete"
    );

    let combined: Vec<f64> = samples.iter().map(|s| s.combined).collect();
    let north: Vec<f64> = samples.iter().map(|s| s.north).collect();
    let south: Vec<f64> = samples.iter().map(|s| s.south).collect();
    let west: Vec<f64> = samples.iter().map(|s| s.west).collect();
    let east: Vec<f64> = samples.iter().map(|s| s.east).collect();

    let result = ResultRecord::from_summaries(
        name,
        daily.len(),
        &truth,
        short_term.len(),
        &confidence_interval(&combined, config.percentile)?,
        &confidence_interval(&north, config.percentile)?,
        &confidence_interval(&south, config.percentile)?,
        &confidence_interval(&west, config.percentile)?,
        &confidence_interval(&east, config.percentile)?,
    );
    let error_rows = samples
        .iter()
        .map(|sample| ErrorRecord::new(name, sample))
        .collect();

    Ok(IntersectionAnalysis { result, error_rows })
}
