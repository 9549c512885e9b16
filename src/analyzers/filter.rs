//! Record-level and day-level data-validity rules.
//!
//! Sub-daily records are screened before aggregation: an all-zero record is a
//! sensor outage, and an implausibly large single count is a malfunction.
//! Whole days are screened after aggregation for undercoverage and for
//! implausibly large adjusted volumes.

use crate::analyzers::types::{CountRecord, DailyVolume, Direction};

/// An all-zero record, which the sensors emit while offline.
pub fn is_missing(record: &CountRecord) -> bool {
    record.vehicles == 0 && Direction::ALL.iter().all(|&d| record.ped(d) == 0)
}

/// Any single directional count above the sub-daily hard cap.
pub fn exceeds_sub_cap(record: &CountRecord, max_sub_interval: u32) -> bool {
    Direction::ALL.iter().any(|&d| record.ped(d) > max_sub_interval)
}

/// A record contributes to daily volumes only when neither rule applies.
pub fn record_is_valid(record: &CountRecord, max_sub_interval: u32) -> bool {
    !is_missing(record) && !exceeds_sub_cap(record, max_sub_interval)
}

/// Fewer valid sub-daily records than a trustworthy day requires.
pub fn undercovered(valid_samples: u32, min_daily_samples: u32) -> bool {
    valid_samples < min_daily_samples
}

/// Any coverage-adjusted daily directional volume above the daily hard cap.
pub fn exceeds_daily_cap(day: &DailyVolume, max_daily_volume: f64) -> bool {
    Direction::ALL.iter().any(|&d| day.ped(d) > max_daily_volume)
}
