//! Error taxonomy for the estimation pipeline.
//!
//! Data-insufficiency variants skip a single intersection while the run
//! continues; a configuration error aborts the whole run before any
//! intersection is analyzed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no count records inside the analysis period")]
    NoRecords,

    #[error("no day survived the daily validity rules")]
    NoValidDays,

    #[error("no day is eligible for a short-term count")]
    NoShortTermDays,

    #[error("{requested} short-term days requested but only {available} are eligible")]
    NotEnoughShortTermDays { available: usize, requested: usize },

    #[error("cannot summarize an empty error series")]
    EmptyErrorSeries,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// Coarse classification reported in the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidConfig(_) => "configuration",
            _ => "data_insufficiency",
        }
    }

    /// True for errors that drop one intersection without failing the run.
    pub fn is_data_insufficiency(&self) -> bool {
        !matches!(self, AnalysisError::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_skip_only_one_intersection() {
        assert!(AnalysisError::NoRecords.is_data_insufficiency());
        assert!(AnalysisError::NoValidDays.is_data_insufficiency());
        assert!(
            AnalysisError::NotEnoughShortTermDays {
                available: 2,
                requested: 3
            }
            .is_data_insufficiency()
        );
        assert!(!AnalysisError::InvalidConfig("bad".into()).is_data_insufficiency());
    }

    #[test]
    fn test_messages_carry_counts() {
        let err = AnalysisError::NotEnoughShortTermDays {
            available: 4,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "10 short-term days requested but only 4 are eligible"
        );
        assert_eq!(err.kind(), "data_insufficiency");
    }
}
