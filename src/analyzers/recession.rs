//! Quarterly GDP loading and recession detection.
//!
//! A recession starts with two consecutive quarters of GDP decline and
//! ends with two consecutive quarters of growth that follow two declines.
//! The bottom is the quarter with the lowest GDP level between the start
//! and the first of the recovering quarters.

use std::ops::Range;
use tracing::{debug, info};

use crate::analyzers::types::{GdpObservation, RecessionWindow};
use crate::config::GdpLayout;
use crate::error::{AnalysisError, Result};
use crate::quarter::Quarter;
use crate::sheet::Grid;

const SOURCE: &str = "GDP sheet";

/// Cleaned chained-dollar GDP, one entry per consecutive quarter.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpSeries {
    observations: Vec<GdpObservation>,
}

impl GdpSeries {
    /// Builds a series from observations, checking that quarters are consecutive.
    pub fn new(observations: Vec<GdpObservation>) -> Result<Self> {
        if observations.len() < 2 {
            return Err(AnalysisError::schema(
                SOURCE,
                format!("need at least two quarters, found {}", observations.len()),
            ));
        }
        for pair in observations.windows(2) {
            if pair[1].quarter != pair[0].quarter.next() {
                return Err(AnalysisError::schema(
                    SOURCE,
                    format!("{} is followed by {}", pair[0].quarter, pair[1].quarter),
                ));
            }
        }
        Ok(Self { observations })
    }

    /// Extracts the analysis window from a sheet laid out as `layout` describes.
    ///
    /// Rows before `header_rows + window_offset` are discarded and reading
    /// stops at the first row whose quarter cell is empty.
    pub fn from_grid(grid: &Grid, layout: &GdpLayout) -> Result<Self> {
        let first_row = layout.header_rows + layout.window_offset;
        if grid.len() <= first_row {
            return Err(AnalysisError::schema(
                SOURCE,
                format!(
                    "sheet has {} rows but the window starts at row {}",
                    grid.len(),
                    first_row + 1
                ),
            ));
        }

        let mut observations = Vec::new();
        for (row_idx, row) in grid.iter().enumerate().skip(first_row) {
            let label = cell(row, layout.quarter_column);
            if label.is_empty() {
                break;
            }

            let quarter: Quarter = label.parse().map_err(|_| {
                AnalysisError::schema(
                    SOURCE,
                    format!("row {}: '{label}' is not a quarter label", row_idx + 1),
                )
            })?;

            let raw = cell(row, layout.chained_column);
            let chained_gdp: f64 = raw.parse().map_err(|_| {
                AnalysisError::schema(
                    SOURCE,
                    format!("row {}: chained GDP '{raw}' is not a number", row_idx + 1),
                )
            })?;

            observations.push(GdpObservation {
                quarter,
                chained_gdp,
            });
        }

        if let (Some(expected), Some(first)) = (layout.first_quarter, observations.first()) {
            if first.quarter != expected {
                return Err(AnalysisError::schema(
                    SOURCE,
                    format!("window starts at {} instead of {expected}", first.quarter),
                ));
            }
        }

        let series = Self::new(observations)?;
        debug!(
            quarters = series.len(),
            first = %series.observations[0].quarter,
            "Loaded GDP series"
        );
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[GdpObservation] {
        &self.observations
    }

    pub fn quarter_at(&self, idx: usize) -> Quarter {
        self.observations[idx].quarter
    }

    /// First differences; the first quarter has no delta.
    pub fn deltas(&self) -> Vec<Option<f64>> {
        std::iter::once(None)
            .chain(
                self.observations
                    .windows(2)
                    .map(|w| Some(w[1].chained_gdp - w[0].chained_gdp)),
            )
            .collect()
    }

    /// Index of the first quarter of two consecutive declines.
    pub fn recession_start_index(&self) -> Option<usize> {
        let d = self.deltas();
        (0..d.len().saturating_sub(1)).find(|&i| falling(&d, i) && falling(&d, i + 1))
    }

    /// Index of the second of two growth quarters that directly follow two
    /// declines, searching from the recession start.
    pub fn recession_end_index(&self) -> Option<usize> {
        let start = self.recession_start_index()?;
        let d = self.deltas();
        (start + 3..d.len()).find(|&i| {
            falling(&d, i - 3) && falling(&d, i - 2) && rising(&d, i - 1) && rising(&d, i)
        })
    }

    /// Half-open index range searched for the bottom: from the start up to
    /// (excluding) the first of two consecutive growth quarters.
    pub fn bottom_search_range(&self) -> Option<Range<usize>> {
        let start = self.recession_start_index()?;
        let d = self.deltas();
        let end = (start + 2..d.len().saturating_sub(1)).find(|&j| rising(&d, j) && rising(&d, j + 1))?;
        Some(start..end)
    }

    /// Index of the lowest GDP level within [`Self::bottom_search_range`].
    ///
    /// This compares GDP levels, not deltas. Ties resolve to the earliest quarter.
    pub fn recession_bottom_index(&self) -> Option<usize> {
        self.bottom_search_range()?.min_by(|&a, &b| {
            self.observations[a]
                .chained_gdp
                .total_cmp(&self.observations[b].chained_gdp)
        })
    }

    pub fn recession_start(&self) -> Option<Quarter> {
        self.recession_start_index().map(|i| self.quarter_at(i))
    }

    pub fn recession_end(&self) -> Option<Quarter> {
        self.recession_end_index().map(|i| self.quarter_at(i))
    }

    pub fn recession_bottom(&self) -> Option<Quarter> {
        self.recession_bottom_index().map(|i| self.quarter_at(i))
    }

    /// All three recession quarters.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NoRecessionFound`] if any of them is absent.
    pub fn recession_window(&self) -> Result<RecessionWindow> {
        let window = RecessionWindow {
            start: self.recession_start().ok_or(AnalysisError::NoRecessionFound)?,
            end: self.recession_end().ok_or(AnalysisError::NoRecessionFound)?,
            bottom: self.recession_bottom().ok_or(AnalysisError::NoRecessionFound)?,
        };
        info!(
            start = %window.start,
            bottom = %window.bottom,
            end = %window.end,
            "Recession located"
        );
        Ok(window)
    }
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|s| s.trim()).unwrap_or("")
}

fn falling(d: &[Option<f64>], i: usize) -> bool {
    matches!(d.get(i), Some(Some(v)) if *v < 0.0)
}

fn rising(d: &[Option<f64>], i: usize) -> bool {
    matches!(d.get(i), Some(Some(v)) if *v > 0.0)
}
