//! Fixed layouts of the reference input files.
//!
//! The reference GDP workbook and housing CSV carry no machine-readable
//! schema; their row and column offsets are part of the file contract.
//! A new revision of either file requires updating these values (or
//! overriding them from the command line).

use crate::quarter::Quarter;

/// Metadata rows above the first quarterly record in the GDP sheet.
pub const GDP_HEADER_ROWS: usize = 8;
/// Quarterly records skipped before the analysis window (1947q1 + 212 = 2000q1).
pub const GDP_WINDOW_OFFSET: usize = 212;
/// Zero-based column holding the `YYYYqN` quarter labels.
pub const GDP_QUARTER_COLUMN: usize = 4;
/// Zero-based column holding GDP in billions of chained 2009 dollars.
pub const GDP_CHAINED_COLUMN: usize = 6;
/// First quarter of the analysis window in the reference workbook.
pub const GDP_FIRST_QUARTER: &str = "2000q1";

/// First monthly value column (after the key columns are removed), 2000-01.
pub const HOUSING_FIRST_COLUMN: usize = 49;
/// One past the last monthly value column.
pub const HOUSING_END_COLUMN: usize = 250;
pub const HOUSING_STATE_HEADER: &str = "State";
pub const HOUSING_REGION_HEADER: &str = "RegionName";

/// Default input locations, relative to the working directory.
pub const DEFAULT_TOWNS_PATH: &str = "university_towns.txt";
pub const DEFAULT_GDP_PATH: &str = "gdplev.xls";
pub const DEFAULT_HOUSING_PATH: &str = "City_Zhvi_AllHomes.csv";

/// Upper bound on a single remote input download.
pub const FETCH_TIMEOUT_SECS: u64 = 120;

/// p-value threshold below which the two groups are reported as different.
pub const SIGNIFICANCE_LEVEL: f64 = 0.01;

/// Position of the quarterly GDP data inside its sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpLayout {
    pub header_rows: usize,
    pub window_offset: usize,
    pub quarter_column: usize,
    pub chained_column: usize,
    /// When set, the first quarter of the window must equal this label.
    pub first_quarter: Option<Quarter>,
}

impl Default for GdpLayout {
    fn default() -> Self {
        Self {
            header_rows: GDP_HEADER_ROWS,
            window_offset: GDP_WINDOW_OFFSET,
            quarter_column: GDP_QUARTER_COLUMN,
            chained_column: GDP_CHAINED_COLUMN,
            first_quarter: GDP_FIRST_QUARTER.parse().ok(),
        }
    }
}

/// Position of the monthly value columns inside the housing CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct HousingLayout {
    pub state_header: String,
    pub region_header: String,
    /// Half-open slice `[first_column, end_column)` over the non-key columns.
    pub first_column: usize,
    pub end_column: usize,
}

impl Default for HousingLayout {
    fn default() -> Self {
        Self {
            state_header: HOUSING_STATE_HEADER.to_string(),
            region_header: HOUSING_REGION_HEADER.to_string(),
            first_column: HOUSING_FIRST_COLUMN,
            end_column: HOUSING_END_COLUMN,
        }
    }
}
