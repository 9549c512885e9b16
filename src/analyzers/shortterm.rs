//! Short-term composite count extraction.
//!
//! A short-term count is what a field crew would collect: the ordinary
//! weekday windows (morning peak, midday, afternoon peak) summed into one
//! eight-hour figure per day. Only neutral days qualify, so holidays, summer
//! and winter months, and days bordering the weekend are excluded.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Timelike};

use crate::analyzers::types::{CountRecord, ShortTermRecord};
use crate::config::AnalysisConfig;

#[derive(Default)]
struct WindowAccumulator {
    ped: [u64; 4],
    vehicles: u64,
}

/// Builds one composite record per eligible day, in date order.
///
/// The raw series is used as-is: no record-level screening is applied here.
/// A day whose windows sum to zero pedestrians is treated as an outage and
/// dropped instead.
pub fn extract_short_term(
    records: &[CountRecord],
    holidays: &HashSet<NaiveDate>,
    config: &AnalysisConfig,
) -> Vec<ShortTermRecord> {
    let mut by_day: BTreeMap<NaiveDate, WindowAccumulator> = BTreeMap::new();

    for record in records {
        let date = record.timestamp.date();
        if !config.stc_weekdays.contains(&date.weekday())
            || !config.stc_months.contains(&date.month())
            || holidays.contains(&date)
        {
            continue;
        }
        let hour = record.timestamp.hour();
        if !config.stc_windows.iter().any(|w| w.contains(hour)) {
            continue;
        }
        let acc = by_day.entry(date).or_default();
        acc.ped[0] += u64::from(record.ped_n);
        acc.ped[1] += u64::from(record.ped_s);
        acc.ped[2] += u64::from(record.ped_w);
        acc.ped[3] += u64::from(record.ped_e);
        acc.vehicles += u64::from(record.vehicles);
    }

    by_day
        .into_iter()
        .filter_map(|(date, acc)| {
            let total: u64 = acc.ped.iter().sum();
            if total == 0 {
                return None;
            }
            Some(ShortTermRecord {
                date,
                ped_n: acc.ped[0],
                ped_s: acc.ped[1],
                ped_w: acc.ped[2],
                ped_e: acc.ped[3],
                vehicles: acc.vehicles,
                total,
            })
        })
        .collect()
}
