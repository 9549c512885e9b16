//! Analysis configuration shared by every stage of the pipeline.

use chrono::Weekday;

use crate::analyzers::error::AnalysisError;

/// An inclusive range of clock hours selecting whole hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// True when `hour` falls inside the window, both ends included.
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour <= self.end
    }
}

/// Tunable parameters of the per-intersection estimation pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Hard cap on a single sub-daily directional count.
    pub max_sub_interval: u32,
    /// Hard cap on a coverage-adjusted daily directional volume.
    pub max_daily_volume: f64,
    /// Minimum number of valid sub-daily records for a day to count.
    pub min_daily_samples: u32,
    /// Sub-daily intervals in a fully covered day, 96 at 15-minute resolution.
    pub expected_intervals: u32,

    /// Clock-hour windows making up the short-term composite count.
    pub stc_windows: Vec<HourWindow>,
    /// Weekdays on which a short-term count may be taken.
    pub stc_weekdays: Vec<Weekday>,
    /// Calendar months (1-12) in which a short-term count may be taken.
    pub stc_months: Vec<u32>,

    /// Number of short-term days available to the simulated analyst.
    pub sample_size: usize,
    /// Resampling trials when `sample_size` is greater than one.
    pub repeat: usize,
    /// Percentile reported alongside the confidence bounds.
    pub percentile: f64,
    /// Base seed for the per-intersection random generators.
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_sub_interval: 100,
            max_daily_volume: 500.0,
            min_daily_samples: 72,
            expected_intervals: 96,
            stc_windows: vec![
                HourWindow::new(7, 9),
                HourWindow::new(11, 14),
                HourWindow::new(15, 18),
            ],
            stc_weekdays: vec![Weekday::Tue, Weekday::Wed, Weekday::Thu],
            stc_months: vec![4, 5, 6, 9, 10, 11],
            sample_size: 1,
            repeat: 100,
            percentile: 85.0,
            seed: 42,
        }
    }
}

impl AnalysisConfig {
    /// Rejects settings under which no day could ever become eligible.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.expected_intervals == 0 {
            return Err(AnalysisError::InvalidConfig(
                "expected_intervals must be at least 1".to_string(),
            ));
        }
        if self.min_daily_samples > self.expected_intervals {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_daily_samples {} exceeds expected_intervals {}, every day would be undercovered",
                self.min_daily_samples, self.expected_intervals
            )));
        }
        if self.max_daily_volume <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "max_daily_volume must be positive".to_string(),
            ));
        }
        if self.stc_windows.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one short-term count window is required".to_string(),
            ));
        }
        for window in &self.stc_windows {
            if window.start > window.end || window.end > 23 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "window {}-{} is not a valid inclusive hour range",
                    window.start, window.end
                )));
            }
        }
        if self.stc_weekdays.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one eligible weekday is required".to_string(),
            ));
        }
        if self.stc_months.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one eligible month is required".to_string(),
            ));
        }
        for &month in &self.stc_months {
            if !(1..=12).contains(&month) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{month} is not a calendar month"
                )));
            }
        }
        if self.sample_size == 0 {
            return Err(AnalysisError::InvalidConfig(
                "sample_size must be at least 1".to_string(),
            ));
        }
        if self.sample_size > 1 && self.repeat == 0 {
            return Err(AnalysisError::InvalidConfig(
                "repeat must be at least 1 when sample_size is greater than 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.percentile) {
            return Err(AnalysisError::InvalidConfig(format!(
                "percentile {} is outside [0, 100]",
                self.percentile
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_window_membership_is_inclusive() {
        let window = HourWindow::new(7, 9);
        assert!(!window.contains(6));
        assert!(window.contains(7));
        assert!(window.contains(8));
        assert!(window.contains(9));
        assert!(!window.contains(10));
    }

    #[test]
    fn test_rejects_min_samples_above_expected_intervals() {
        let config = AnalysisConfig {
            min_daily_samples: 97,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_rejects_reversed_window() {
        let config = AnalysisConfig {
            stc_windows: vec![HourWindow::new(9, 7)],
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_hour_past_midnight() {
        let config = AnalysisConfig {
            stc_windows: vec![HourWindow::new(20, 24)],
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sample_size() {
        let config = AnalysisConfig {
            sample_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_repeat_only_when_resampling() {
        let exhaustive = AnalysisConfig {
            sample_size: 1,
            repeat: 0,
            ..AnalysisConfig::default()
        };
        assert!(exhaustive.validate().is_ok());

        let resampled = AnalysisConfig {
            sample_size: 3,
            repeat: 0,
            ..AnalysisConfig::default()
        };
        assert!(resampled.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_percentile() {
        let config = AnalysisConfig {
            percentile: 101.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_month_thirteen() {
        let config = AnalysisConfig {
            stc_months: vec![4, 13],
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
