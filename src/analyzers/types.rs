//! Data types shared by the analysis pipeline.

use serde::Serialize;
use std::fmt;

use crate::quarter::Quarter;

/// A town from the university town list.
///
/// `state` is `None` when the town appeared before any state header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TownRecord {
    pub state: Option<String>,
    pub region: String,
}

impl TownRecord {
    pub fn new(state: &str, region: &str) -> Self {
        Self {
            state: Some(state.to_string()),
            region: region.to_string(),
        }
    }

    /// The join key, if the town has a state.
    pub fn key(&self) -> Option<RegionKey> {
        self.state
            .as_ref()
            .map(|state| RegionKey::new(state, &self.region))
    }
}

/// Composite `(State, RegionName)` key of a housing row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionKey {
    pub state: String,
    pub region: String,
}

impl RegionKey {
    pub fn new(state: &str, region: &str) -> Self {
        Self {
            state: state.to_string(),
            region: region.to_string(),
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.region, self.state)
    }
}

/// One quarter of the cleaned GDP series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GdpObservation {
    pub quarter: Quarter,
    pub chained_gdp: f64,
}

/// Start, end and bottom quarters of a recession. `start <= bottom <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecessionWindow {
    pub start: Quarter,
    pub end: Quarter,
    pub bottom: Quarter,
}

/// A keyed row of values, one per column of the owning table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRow {
    pub key: RegionKey,
    pub values: Vec<Option<f64>>,
}

/// Monthly home values as read from the housing file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTable {
    pub columns: Vec<String>,
    pub rows: Vec<KeyedRow>,
}

/// Quarterly mean home values. `None` marks a quarter with no monthly data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HousingTable {
    pub quarters: Vec<Quarter>,
    pub rows: Vec<KeyedRow>,
}

impl HousingTable {
    /// Column index of `quarter`, if the table has it.
    pub fn column(&self, quarter: Quarter) -> Option<usize> {
        self.quarters.iter().position(|q| *q == quarter)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.quarters.len())
    }
}

/// Price at the pre-recession quarter over price at the bottom quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRatio {
    pub key: RegionKey,
    pub ratio: f64,
}

/// The two populations compared by the t-test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub university: Vec<PriceRatio>,
    pub non_university: Vec<PriceRatio>,
}

impl Partition {
    pub fn university_ratios(&self) -> Vec<f64> {
        self.university.iter().map(|r| r.ratio).collect()
    }

    pub fn non_university_ratios(&self) -> Vec<f64> {
        self.non_university.iter().map(|r| r.ratio).collect()
    }
}

/// Which group had the smaller price decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TownGroup {
    #[serde(rename = "university town")]
    University,
    #[serde(rename = "non-university town")]
    NonUniversity,
}

impl TownGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            TownGroup::University => "university town",
            TownGroup::NonUniversity => "non-university town",
        }
    }
}

impl fmt::Display for TownGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw output of a two-sample Student's t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestStatistics {
    pub t_statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    pub mean_a: f64,
    pub mean_b: f64,
    pub n_a: usize,
    pub n_b: usize,
}

/// Final answer of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HypothesisTestResult {
    pub different: bool,
    pub p_value: f64,
    pub better: TownGroup,
}

/// Everything a full run produced, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub window: RecessionWindow,
    pub statistics: TestStatistics,
    pub result: HypothesisTestResult,
}
