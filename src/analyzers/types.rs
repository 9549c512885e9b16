//! Data types used by the estimation pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// One pedestrian crossing direction at an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All four directions in canonical N, S, W, E order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::West => "W",
            Direction::East => "E",
        }
    }
}

/// A single sub-daily sensor observation at one intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRecord {
    pub timestamp: NaiveDateTime,

    pub ped_n: u32,
    pub ped_s: u32,
    pub ped_w: u32,
    pub ped_e: u32,

    pub vehicles: u32,
}

impl CountRecord {
    pub fn ped(&self, direction: Direction) -> u32 {
        match direction {
            Direction::North => self.ped_n,
            Direction::South => self.ped_s,
            Direction::West => self.ped_w,
            Direction::East => self.ped_e,
        }
    }
}

/// One calendar day's coverage-adjusted directional pedestrian volumes.
///
/// `valid` reflects the day-level quality rules; invalid days are kept so
/// callers can report how much data was discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyVolume {
    pub date: NaiveDate,

    pub ped_n: f64,
    pub ped_s: f64,
    pub ped_w: f64,
    pub ped_e: f64,

    pub valid_samples: u32,
    pub valid: bool,
}

impl DailyVolume {
    pub fn ped(&self, direction: Direction) -> f64 {
        match direction {
            Direction::North => self.ped_n,
            Direction::South => self.ped_s,
            Direction::West => self.ped_w,
            Direction::East => self.ped_e,
        }
    }
}

/// An eight-hour composite count for one day eligible as a short-term sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortTermRecord {
    pub date: NaiveDate,

    pub ped_n: u64,
    pub ped_s: u64,
    pub ped_w: u64,
    pub ped_e: u64,
    pub vehicles: u64,

    /// Sum of the four directional counts, always positive.
    pub total: u64,
}

impl ShortTermRecord {
    pub fn ped(&self, direction: Direction) -> u64 {
        match direction {
            Direction::North => self.ped_n,
            Direction::South => self.ped_s,
            Direction::West => self.ped_w,
            Direction::East => self.ped_e,
        }
    }
}

/// Annualized traffic estimate and the directional shares derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrueRatioSet {
    /// Total AADPT across all four directions.
    pub total: f64,

    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl TrueRatioSet {
    pub fn ratio(&self, direction: Direction) -> f64 {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::West => self.west,
            Direction::East => self.east,
        }
    }
}

/// Signed relative ratio errors from one simulated short-term estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSample {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,

    /// Mean of the four absolute directional errors.
    pub combined: f64,
}

/// Normal-approximation summary of one error series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceResult {
    pub lower: f64,
    pub mean: f64,
    pub upper: f64,
    pub percentile: f64,
}

/// One per-intersection row of the results CSV.
///
/// Column names follow the layout the downstream notebooks expect.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub intersection: String,
    #[serde(rename = "valid_24h_counts")]
    pub valid_daily_counts: usize,
    #[serde(rename = "AADPT")]
    pub aadpt: f64,

    #[serde(rename = "ratio_N_true")]
    pub ratio_n_true: f64,
    #[serde(rename = "ratio_S_true")]
    pub ratio_s_true: f64,
    #[serde(rename = "ratio_W_true")]
    pub ratio_w_true: f64,
    #[serde(rename = "ratio_E_true")]
    pub ratio_e_true: f64,

    #[serde(rename = "valid_8h_stc")]
    pub valid_stc_days: usize,

    #[serde(rename = "LB_avg_err")]
    pub lb_avg_err: f64,
    #[serde(rename = "MEAN_avg_err")]
    pub mean_avg_err: f64,
    #[serde(rename = "UB_avg_err")]
    pub ub_avg_err: f64,
    #[serde(rename = "PTILE_avg_err")]
    pub ptile_avg_err: f64,

    #[serde(rename = "LB_N_err")]
    pub lb_n_err: f64,
    #[serde(rename = "MEAN_N_err")]
    pub mean_n_err: f64,
    #[serde(rename = "UB_N_err")]
    pub ub_n_err: f64,
    #[serde(rename = "PTILE_N_err")]
    pub ptile_n_err: f64,

    #[serde(rename = "LB_S_err")]
    pub lb_s_err: f64,
    #[serde(rename = "MEAN_S_err")]
    pub mean_s_err: f64,
    #[serde(rename = "UB_S_err")]
    pub ub_s_err: f64,
    #[serde(rename = "PTILE_S_err")]
    pub ptile_s_err: f64,

    #[serde(rename = "LB_W_err")]
    pub lb_w_err: f64,
    #[serde(rename = "MEAN_W_err")]
    pub mean_w_err: f64,
    #[serde(rename = "UB_W_err")]
    pub ub_w_err: f64,
    #[serde(rename = "PTILE_W_err")]
    pub ptile_w_err: f64,

    #[serde(rename = "LB_E_err")]
    pub lb_e_err: f64,
    #[serde(rename = "MEAN_E_err")]
    pub mean_e_err: f64,
    #[serde(rename = "UB_E_err")]
    pub ub_e_err: f64,
    #[serde(rename = "PTILE_E_err")]
    pub ptile_e_err: f64,
}

impl ResultRecord {
    /// Assembles a row from the per-series confidence summaries.
    #[allow(clippy::too_many_arguments)]
    pub fn from_summaries(
        intersection: &str,
        valid_daily_counts: usize,
        truth: &TrueRatioSet,
        valid_stc_days: usize,
        combined: &ConfidenceResult,
        north: &ConfidenceResult,
        south: &ConfidenceResult,
        west: &ConfidenceResult,
        east: &ConfidenceResult,
    ) -> Self {
        Self {
            intersection: intersection.to_string(),
            valid_daily_counts,
            aadpt: truth.total,
            ratio_n_true: truth.north,
            ratio_s_true: truth.south,
            ratio_w_true: truth.west,
            ratio_e_true: truth.east,
            valid_stc_days,
            lb_avg_err: combined.lower,
            mean_avg_err: combined.mean,
            ub_avg_err: combined.upper,
            ptile_avg_err: combined.percentile,
            lb_n_err: north.lower,
            mean_n_err: north.mean,
            ub_n_err: north.upper,
            ptile_n_err: north.percentile,
            lb_s_err: south.lower,
            mean_s_err: south.mean,
            ub_s_err: south.upper,
            ptile_s_err: south.percentile,
            lb_w_err: west.lower,
            mean_w_err: west.mean,
            ub_w_err: west.upper,
            ptile_w_err: west.percentile,
            lb_e_err: east.lower,
            mean_e_err: east.mean,
            ub_e_err: east.upper,
            ptile_e_err: east.percentile,
        }
    }
}

/// One raw error sample row of the errors CSV.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub intersection: String,

    #[serde(rename = "ratio_N_errs")]
    pub ratio_n_errs: f64,
    #[serde(rename = "ratio_S_errs")]
    pub ratio_s_errs: f64,
    #[serde(rename = "ratio_W_errs")]
    pub ratio_w_errs: f64,
    #[serde(rename = "ratio_E_errs")]
    pub ratio_e_errs: f64,
    #[serde(rename = "ratio_avg_errs")]
    pub ratio_avg_errs: f64,
}

impl ErrorRecord {
    pub fn new(intersection: &str, sample: &ErrorSample) -> Self {
        Self {
            intersection: intersection.to_string(),
            ratio_n_errs: sample.north,
            ratio_s_errs: sample.south,
            ratio_w_errs: sample.west,
            ratio_e_errs: sample.east,
            ratio_avg_errs: sample.combined,
        }
    }
}

/// An intersection dropped from the run, with the reason it was dropped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedIntersection {
    pub intersection: String,
    pub kind: String,
    pub reason: String,
}

/// Top-level run summary, written as `<dataset>_summary.json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub dataset: String,

    pub seed: u64,
    pub sample_size: usize,
    pub repeat: usize,
    pub percentile: f64,

    pub intersections_processed: usize,
    pub intersections_skipped: usize,
    pub skipped: Vec<SkippedIntersection>,
}
