//! Daily volume aggregation with partial-day coverage adjustment.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analyzers::filter;
use crate::analyzers::types::{CountRecord, DailyVolume};
use crate::config::AnalysisConfig;

#[derive(Default)]
struct DayAccumulator {
    ped: [u64; 4],
    valid_samples: u32,
}

/// Collapses one intersection's records into per-day adjusted volumes.
///
/// Records failing the sub-daily rules never contribute. Each day's raw sums
/// are rescaled by `expected_intervals / valid_samples` so partially covered
/// days compare against fully covered ones, then the day-level rules set the
/// `valid` flag. A day whose records were all invalid produces no entry at
/// all, so rescaling never divides by zero.
pub fn daily_volumes(records: &[CountRecord], config: &AnalysisConfig) -> Vec<DailyVolume> {
    let mut by_day: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for record in records {
        if !filter::record_is_valid(record, config.max_sub_interval) {
            continue;
        }
        let acc = by_day.entry(record.timestamp.date()).or_default();
        acc.ped[0] += u64::from(record.ped_n);
        acc.ped[1] += u64::from(record.ped_s);
        acc.ped[2] += u64::from(record.ped_w);
        acc.ped[3] += u64::from(record.ped_e);
        acc.valid_samples += 1;
    }

    by_day
        .into_iter()
        .map(|(date, acc)| {
            let factor = f64::from(config.expected_intervals) / f64::from(acc.valid_samples);
            let mut day = DailyVolume {
                date,
                ped_n: acc.ped[0] as f64 * factor,
                ped_s: acc.ped[1] as f64 * factor,
                ped_w: acc.ped[2] as f64 * factor,
                ped_e: acc.ped[3] as f64 * factor,
                valid_samples: acc.valid_samples,
                valid: true,
            };
            day.valid = !filter::undercovered(day.valid_samples, config.min_daily_samples)
                && !filter::exceeds_daily_cap(&day, config.max_daily_volume);
            day
        })
        .collect()
}

/// Only the days that survive the day-level rules, in date order.
pub fn valid_daily_volumes(records: &[CountRecord], config: &AnalysisConfig) -> Vec<DailyVolume> {
    daily_volumes(records, config)
        .into_iter()
        .filter(|day| day.valid)
        .collect()
}
