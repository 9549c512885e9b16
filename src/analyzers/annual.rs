//! Stratified annualization and true directional ratios.
//!
//! A year of valid days is rarely balanced: sensors drop out for weeks at a
//! time, so some month/weekday combinations are overrepresented. Averaging
//! inside each (month, weekday) stratum first and then across strata removes
//! that bias, the same way road agencies annualize motor traffic counts.

use std::collections::BTreeSet;

use chrono::Datelike;

use crate::analyzers::types::{DailyVolume, Direction, TrueRatioSet};

/// Average annual daily pedestrian traffic for one direction.
///
/// Divisors are the global counts of distinct months and distinct weekdays
/// present anywhere in the data; a (month, weekday) stratum with no days is
/// skipped rather than averaged in as zero. Empty input yields 0.0.
pub fn estimate_aadpt(days: &[DailyVolume], direction: Direction) -> f64 {
    if days.is_empty() {
        return 0.0;
    }

    let months: BTreeSet<u32> = days.iter().map(|d| d.date.month()).collect();
    let weekdays: BTreeSet<u32> = days
        .iter()
        .map(|d| d.date.weekday().num_days_from_monday())
        .collect();

    let month_weight = 1.0 / months.len() as f64;
    let weekday_weight = 1.0 / weekdays.len() as f64;

    let mut aadpt = 0.0;
    for &month in &months {
        for &weekday in &weekdays {
            let mut sum = 0.0;
            let mut n_days = 0usize;
            for day in days {
                if day.date.month() == month
                    && day.date.weekday().num_days_from_monday() == weekday
                {
                    sum += day.ped(direction);
                    n_days += 1;
                }
            }
            if n_days > 0 {
                aadpt += month_weight * weekday_weight * sum / n_days as f64;
            }
        }
    }
    aadpt
}

/// Total AADPT across directions and each direction's share of it.
///
/// A zero total yields all-zero ratios instead of dividing by zero; callers
/// treat that as a degenerate intersection, not an error.
pub fn true_ratios(days: &[DailyVolume]) -> TrueRatioSet {
    let north = estimate_aadpt(days, Direction::North);
    let south = estimate_aadpt(days, Direction::South);
    let west = estimate_aadpt(days, Direction::West);
    let east = estimate_aadpt(days, Direction::East);
    let total = north + south + west + east;

    if total == 0.0 {
        return TrueRatioSet {
            total,
            north: 0.0,
            south: 0.0,
            west: 0.0,
            east: 0.0,
        };
    }
    TrueRatioSet {
        total,
        north: north / total,
        south: south / total,
        west: west / total,
        east: east / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(year: i32, month: u32, day_of_month: u32, ped_n: f64) -> DailyVolume {
        DailyVolume {
            date: NaiveDate::from_ymd_opt(year, month, day_of_month).unwrap(),
            ped_n,
            ped_s: 0.0,
            ped_w: 0.0,
            ped_e: 0.0,
            valid_samples: 96,
            valid: true,
        }
    }

    #[test]
    fn test_empty_input_yields_zero() {
        assert_eq!(estimate_aadpt(&[], Direction::North), 0.0);
    }

    #[test]
    fn test_single_stratum_is_a_plain_mean() {
        // Two Mondays in April.
        let days = vec![day(2022, 4, 4, 80.0), day(2022, 4, 11, 120.0)];
        assert!((estimate_aadpt(&days, Direction::North) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_overrepresented_stratum_does_not_dominate() {
        // Two April Mondays at 100 against one May Tuesday at 50. A plain mean
        // would give 83.3; stratifying weighs each stratum equally.
        let days = vec![
            day(2022, 4, 4, 100.0),
            day(2022, 4, 11, 100.0),
            day(2022, 5, 3, 50.0),
        ];
        assert!((estimate_aadpt(&days, Direction::North) - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_complete_coverage_of_constant_volume_recovers_it() {
        // Two months, three weekdays, all six strata populated at 100.
        let days = vec![
            day(2022, 4, 5, 100.0),
            day(2022, 4, 12, 100.0),
            day(2022, 4, 6, 100.0),
            day(2022, 4, 13, 100.0),
            day(2022, 4, 7, 100.0),
            day(2022, 4, 14, 100.0),
            day(2022, 5, 3, 100.0),
            day(2022, 5, 10, 100.0),
            day(2022, 5, 4, 100.0),
            day(2022, 5, 5, 100.0),
        ];
        assert!((estimate_aadpt(&days, Direction::North) - 100.0).abs() < 1e-9);

        let truth = true_ratios(&days);
        assert!((truth.total - 100.0).abs() < 1e-9);
        assert!((truth.north - 1.0).abs() < 1e-9);
        assert_eq!(truth.south, 0.0);
        assert_eq!(truth.west, 0.0);
        assert_eq!(truth.east, 0.0);
    }

    #[test]
    fn test_ratios_sum_to_one_for_mixed_volumes() {
        let mut days = vec![day(2022, 4, 4, 60.0), day(2022, 4, 11, 40.0)];
        for d in &mut days {
            d.ped_s = 30.0;
            d.ped_w = 20.0;
            d.ped_e = 10.0;
        }
        let truth = true_ratios(&days);
        let sum = truth.north + truth.south + truth.west + truth.east;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(truth.north > truth.south);
        assert!((truth.ratio(Direction::West) - 20.0 / 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_yields_zero_ratios_not_nan() {
        let days = vec![day(2022, 4, 4, 0.0), day(2022, 5, 3, 0.0)];
        let truth = true_ratios(&days);
        assert_eq!(truth.total, 0.0);
        assert_eq!(truth.north, 0.0);
        assert_eq!(truth.east, 0.0);
    }
}
