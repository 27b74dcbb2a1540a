use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::AnalysisOutcome;

/// Flat record of one analysis run, suitable for CSV and JSON output.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,

    // recession window
    pub recession_start: Option<String>,
    pub recession_bottom: Option<String>,
    pub recession_end: Option<String>,

    // populations
    pub university_towns: usize,
    pub non_university_towns: usize,
    pub university_mean_ratio: Option<f64>,
    pub non_university_mean_ratio: Option<f64>,

    // test
    pub t_statistic: Option<f64>,
    pub degrees_of_freedom: Option<f64>,
    pub p_value: Option<f64>,
    pub different: Option<bool>,
    pub better: Option<String>,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl RunReport {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let stats = &outcome.statistics;
        RunReport {
            timestamp: Utc::now(),
            recession_start: Some(outcome.window.start.to_string()),
            recession_bottom: Some(outcome.window.bottom.to_string()),
            recession_end: Some(outcome.window.end.to_string()),
            university_towns: stats.n_a,
            non_university_towns: stats.n_b,
            university_mean_ratio: Some(stats.mean_a),
            non_university_mean_ratio: Some(stats.mean_b),
            t_statistic: Some(stats.t_statistic),
            degrees_of_freedom: Some(stats.degrees_of_freedom),
            p_value: Some(outcome.result.p_value),
            different: Some(outcome.result.different),
            better: Some(outcome.result.better.to_string()),
            error_type: None,
            error_message: None,
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        RunReport {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_type.is_some()
    }

    /// The `(different, p, better)` triple, if the run succeeded.
    pub fn answer(&self) -> Option<(bool, f64, &str)> {
        Some((self.different?, self.p_value?, self.better.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{
        HypothesisTestResult, RecessionWindow, TestStatistics, TownGroup,
    };

    fn outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            window: RecessionWindow {
                start: "2008q3".parse().unwrap(),
                end: "2009q4".parse().unwrap(),
                bottom: "2009q2".parse().unwrap(),
            },
            statistics: TestStatistics {
                t_statistic: -2.5,
                p_value: 0.004,
                degrees_of_freedom: 10.0,
                mean_a: 1.03,
                mean_b: 1.07,
                n_a: 4,
                n_b: 8,
            },
            result: HypothesisTestResult {
                different: true,
                p_value: 0.004,
                better: TownGroup::University,
            },
        }
    }

    #[test]
    fn test_from_outcome() {
        let report = RunReport::from_outcome(&outcome());

        assert_eq!(report.recession_start.as_deref(), Some("2008q3"));
        assert_eq!(report.recession_bottom.as_deref(), Some("2009q2"));
        assert_eq!(report.university_towns, 4);
        assert_eq!(report.non_university_towns, 8);
        assert!(!report.is_error());
        assert_eq!(report.answer(), Some((true, 0.004, "university town")));
    }

    #[test]
    fn test_from_error() {
        let report = RunReport::from_error("no_recession_found", "no recession found");

        assert!(report.is_error());
        assert_eq!(report.answer(), None);
        assert_eq!(report.university_towns, 0);
    }
}
