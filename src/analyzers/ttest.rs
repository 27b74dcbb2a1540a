//! Price-ratio comparison between university and non-university towns.

use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::analyzers::types::{
    AnalysisOutcome, HousingTable, HypothesisTestResult, Partition, PriceRatio, RecessionWindow,
    RegionKey, TestStatistics, TownGroup, TownRecord,
};
use crate::analyzers::utility::{mean, sample_variance};
use crate::config::SIGNIFICANCE_LEVEL;
use crate::error::{AnalysisError, Result};
use crate::quarter::Quarter;

/// `value[before] / value[bottom]` for every row that has both values.
///
/// Rows whose ratio is undefined (a zero or non-finite bottom value) are
/// dropped along with the rows that lack a value.
///
/// # Errors
///
/// Returns [`AnalysisError::SchemaMismatch`] if the table lacks either quarter.
pub fn price_ratios(
    housing: &HousingTable,
    before: Quarter,
    bottom: Quarter,
) -> Result<Vec<PriceRatio>> {
    let column = |quarter: Quarter| {
        housing.column(quarter).ok_or_else(|| {
            AnalysisError::schema("housing table", format!("no column for quarter {quarter}"))
        })
    };
    let before_idx = column(before)?;
    let bottom_idx = column(bottom)?;

    let ratios: Vec<PriceRatio> = housing
        .rows
        .iter()
        .filter_map(|row| {
            let before = row.values.get(before_idx).copied().flatten()?;
            let bottom = row.values.get(bottom_idx).copied().flatten()?;
            let ratio = before / bottom;
            ratio.is_finite().then(|| PriceRatio {
                key: row.key.clone(),
                ratio,
            })
        })
        .collect();

    debug!(
        rows = housing.rows.len(),
        kept = ratios.len(),
        dropped = housing.rows.len() - ratios.len(),
        "Computed price ratios"
    );
    Ok(ratios)
}

/// Splits ratio rows by whether their key appears in the town list.
///
/// Every row lands in exactly one group. Towns without a state never match.
pub fn partition_by_towns(ratios: &[PriceRatio], towns: &[TownRecord]) -> Partition {
    let listed: HashSet<RegionKey> = towns.iter().filter_map(TownRecord::key).collect();

    let (university, non_university): (Vec<PriceRatio>, Vec<PriceRatio>) = ratios
        .iter()
        .cloned()
        .partition(|r| listed.contains(&r.key));

    Partition {
        university,
        non_university,
    }
}

/// Two-sample Student's t-test with pooled variance, two-sided.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] if a sample is empty or there
/// are fewer than three observations in total.
pub fn students_t_test(a: &[f64], b: &[f64]) -> Result<TestStatistics> {
    if a.is_empty() || b.is_empty() {
        return Err(AnalysisError::InsufficientData(format!(
            "both groups need observations (got {} and {})",
            a.len(),
            b.len()
        )));
    }
    let (n_a, n_b) = (a.len(), b.len());
    let df = (n_a + n_b) as f64 - 2.0;
    if df < 1.0 {
        return Err(AnalysisError::InsufficientData(format!(
            "{} observations leave no degrees of freedom",
            n_a + n_b
        )));
    }

    let mean_a = mean(a);
    let mean_b = mean(b);
    let pooled = ((n_a - 1) as f64 * sample_variance(a, mean_a)
        + (n_b - 1) as f64 * sample_variance(b, mean_b))
        / df;
    let std_err = (pooled * (1.0 / n_a as f64 + 1.0 / n_b as f64)).sqrt();
    let t_statistic = (mean_a - mean_b) / std_err;

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AnalysisError::InsufficientData(e.to_string()))?;
    let p_value = if t_statistic.is_nan() {
        f64::NAN
    } else {
        (2.0 * dist.sf(t_statistic.abs())).min(1.0)
    };

    Ok(TestStatistics {
        t_statistic,
        p_value,
        degrees_of_freedom: df,
        mean_a,
        mean_b,
        n_a,
        n_b,
    })
}

/// Reads the test statistics with university towns as the first sample.
///
/// A lower mean ratio is a smaller loss, so a negative t favours university towns.
pub fn interpret(stats: &TestStatistics) -> HypothesisTestResult {
    HypothesisTestResult {
        different: stats.p_value < SIGNIFICANCE_LEVEL,
        p_value: stats.p_value,
        better: if stats.t_statistic < 0.0 {
            TownGroup::University
        } else {
            TownGroup::NonUniversity
        },
    }
}

/// Runs the comparison for an already located recession window.
pub fn run_ttest(
    housing: &HousingTable,
    towns: &[TownRecord],
    window: RecessionWindow,
) -> Result<AnalysisOutcome> {
    let ratios = price_ratios(housing, window.start, window.bottom)?;
    let partition = partition_by_towns(&ratios, towns);

    let statistics = students_t_test(
        &partition.university_ratios(),
        &partition.non_university_ratios(),
    )?;
    let result = interpret(&statistics);

    info!(
        university = statistics.n_a,
        non_university = statistics.n_b,
        t = statistics.t_statistic,
        p = statistics.p_value,
        different = result.different,
        better = %result.better,
        "T-test complete"
    );

    Ok(AnalysisOutcome {
        window,
        statistics,
        result,
    })
}
