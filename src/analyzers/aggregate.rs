use crate::analyzers::types::{HousingTable, KeyedRow, MonthlyTable, RegionKey};
use crate::analyzers::utility::mean_present;
use crate::config::HousingLayout;
use crate::error::{AnalysisError, Result};
use crate::quarter::Quarter;
use crate::states::state_name;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

const SOURCE: &str = "housing CSV";

/// Reads the monthly home-value CSV.
///
/// The `State` and `RegionName` columns form the row key, with the state
/// code replaced by its full name. Of the remaining columns, only the
/// `[first_column, end_column)` slice is kept; the slice is clamped to the
/// columns the file actually has.
pub fn read_monthly_table(bytes: &[u8], layout: &HousingLayout) -> Result<MonthlyTable> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| AnalysisError::schema(SOURCE, format!("missing '{name}' column")))
    };
    let state_idx = find(layout.state_header.as_str())?;
    let region_idx = find(layout.region_header.as_str())?;

    let value_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != state_idx && i != region_idx)
        .collect();
    if layout.first_column >= value_idx.len() {
        return Err(AnalysisError::schema(
            SOURCE,
            format!(
                "value slice starts at column {} but only {} value columns exist",
                layout.first_column,
                value_idx.len()
            ),
        ));
    }
    let end = layout.end_column.min(value_idx.len());
    let selected = &value_idx[layout.first_column..end];

    let columns: Vec<String> = selected
        .iter()
        .map(|&i| headers[i].trim().to_string())
        .collect();
    if let Some(bad) = columns
        .iter()
        .find(|c| Quarter::from_month_label(c).is_none())
    {
        return Err(AnalysisError::schema(
            SOURCE,
            format!("selected column '{bad}' is not a month"),
        ));
    }

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    let mut unknown_codes = BTreeSet::new();

    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let line = n + 2;

        let code = record.get(state_idx).unwrap_or("").trim();
        let state = match state_name(code) {
            Ok(name) => name.to_string(),
            Err(_) => {
                unknown_codes.insert(code.to_string());
                code.to_string()
            }
        };
        let region = record.get(region_idx).unwrap_or("").trim();
        let key = RegionKey::new(&state, region);

        let values = selected
            .iter()
            .zip(&columns)
            .map(|(&i, column)| parse_value(record.get(i).unwrap_or(""), line, column))
            .collect::<Result<Vec<_>>>()?;

        if !seen.insert(key.clone()) {
            duplicates += 1;
        }
        rows.push(KeyedRow { key, values });
    }

    if !unknown_codes.is_empty() {
        warn!(codes = ?unknown_codes, "Unknown state codes kept as-is");
    }
    if duplicates > 0 {
        warn!(duplicates, "Housing rows with a repeated (State, RegionName) key");
    }

    debug!(
        rows = rows.len(),
        months = columns.len(),
        "Read monthly housing table"
    );
    Ok(MonthlyTable { columns, rows })
}

fn parse_value(raw: &str, line: usize, column: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| {
        AnalysisError::schema(
            SOURCE,
            format!("line {line}, column {column}: '{raw}' is not a number"),
        )
    })?;
    Ok((!value.is_nan()).then_some(value))
}

/// Groups monthly columns by quarter and averages them, skipping missing
/// months. Quarter columns come out in chronological order.
pub fn aggregate_quarters(table: &MonthlyTable) -> Result<HousingTable> {
    let mut groups: BTreeMap<Quarter, Vec<usize>> = BTreeMap::new();
    for (i, column) in table.columns.iter().enumerate() {
        let quarter = Quarter::from_month_label(column).ok_or_else(|| {
            AnalysisError::schema(SOURCE, format!("column '{column}' is not a month"))
        })?;
        groups.entry(quarter).or_default().push(i);
    }

    let rows = table
        .rows
        .iter()
        .map(|row| KeyedRow {
            key: row.key.clone(),
            values: groups
                .values()
                .map(|months| {
                    mean_present(months.iter().map(|&i| row.values.get(i).copied().flatten()))
                })
                .collect(),
        })
        .collect();

    let housing = HousingTable {
        quarters: groups.into_keys().collect(),
        rows,
    };

    info!(
        rows = housing.rows.len(),
        quarters = housing.quarters.len(),
        first = ?housing.quarters.first().map(ToString::to_string),
        last = ?housing.quarters.last().map(ToString::to_string),
        "Converted housing data to quarters"
    );
    Ok(housing)
}

/// Reads the housing CSV and converts it to quarterly means.
pub fn convert_housing_data_to_quarters(
    bytes: &[u8],
    layout: &HousingLayout,
) -> Result<HousingTable> {
    aggregate_quarters(&read_monthly_table(bytes, layout)?)
}
