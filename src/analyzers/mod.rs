//! Recession location, housing aggregation and the university-town t-test.
//!
//! This module turns the GDP series into a recession window, reshapes the
//! monthly housing data into quarterly means, and compares price ratios
//! of university and non-university towns across that window.

pub mod aggregate;
pub mod analyzer;
pub mod recession;
pub mod ttest;
pub mod types;
pub mod utility;
