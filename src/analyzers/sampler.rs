//! Ratio-error simulation from limited short-term counts.
//!
//! Rates how well an analyst holding only `sample_size` short-term days
//! would have estimated the true directional ratios. With one day the
//! simulation is exhaustive over the eligible days; with more it draws
//! `repeat` random day subsets without replacement and pools their counts.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::analyzers::error::AnalysisError;
use crate::analyzers::types::{ErrorSample, ShortTermRecord, TrueRatioSet};
use crate::analyzers::utility::finite_or_zero;
use crate::config::AnalysisConfig;

/// Stabilizer added to the true-ratio denominator so a zero true share still
/// produces a finite relative error.
pub const RATIO_EPSILON: f64 = 1e-4;

/// Signed relative error of an estimated ratio against its true value.
fn relative_error(estimated: f64, truth: f64) -> f64 {
    (estimated - truth) / (truth + RATIO_EPSILON)
}

fn score_ratios(north: f64, south: f64, west: f64, east: f64, truth: &TrueRatioSet) -> ErrorSample {
    let north = finite_or_zero(relative_error(north, truth.north));
    let south = finite_or_zero(relative_error(south, truth.south));
    let west = finite_or_zero(relative_error(west, truth.west));
    let east = finite_or_zero(relative_error(east, truth.east));
    let combined = (north.abs() + south.abs() + west.abs() + east.abs()) / 4.0;
    ErrorSample {
        north,
        south,
        west,
        east,
        combined,
    }
}

fn score_single_day(day: &ShortTermRecord, truth: &TrueRatioSet) -> ErrorSample {
    let total = day.total as f64;
    score_ratios(
        day.ped_n as f64 / total,
        day.ped_s as f64 / total,
        day.ped_w as f64 / total,
        day.ped_e as f64 / total,
        truth,
    )
}

/// Simulates ratio estimation from `config.sample_size` short-term days and
/// scores every trial against the true ratios.
///
/// With `sample_size == 1` each eligible day becomes one trial, in date
/// order, and `rng` is never touched. Larger sizes run `config.repeat`
/// trials, each pooling the counts of a day subset drawn without
/// replacement from `rng`.
pub fn sample_ratio_errors(
    short_term: &[ShortTermRecord],
    truth: &TrueRatioSet,
    config: &AnalysisConfig,
    rng: &mut StdRng,
) -> Result<Vec<ErrorSample>, AnalysisError> {
    if short_term.is_empty() {
        return Err(AnalysisError::NoShortTermDays);
    }
    if config.sample_size > short_term.len() {
        return Err(AnalysisError::NotEnoughShortTermDays {
            available: short_term.len(),
            requested: config.sample_size,
        });
    }

    if config.sample_size == 1 {
        return Ok(short_term
            .iter()
            .map(|day| score_single_day(day, truth))
            .collect());
    }

    let mut samples = Vec::with_capacity(config.repeat);
    for _ in 0..config.repeat {
        let mut ped = [0u64; 4];
        let mut total = 0u64;
        for day in short_term.choose_multiple(rng, config.sample_size) {
            ped[0] += day.ped_n;
            ped[1] += day.ped_s;
            ped[2] += day.ped_w;
            ped[3] += day.ped_e;
            total += day.total;
        }
        let total = total as f64;
        samples.push(score_ratios(
            ped[0] as f64 / total,
            ped[1] as f64 / total,
            ped[2] as f64 / total,
            ped[3] as f64 / total,
            truth,
        ));
    }
    Ok(samples)
}
