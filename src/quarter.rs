//! Calendar quarter labels of the form `YYYYqN`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar quarter. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: u16,
    quarter: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a quarter label")]
pub struct ParseQuarterError(String);

impl Quarter {
    /// Returns `None` unless `quarter` is in `1..=4`.
    pub fn new(year: u16, quarter: u8) -> Option<Self> {
        (1..=4).contains(&quarter).then_some(Quarter { year, quarter })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// The quarter immediately after this one.
    pub fn next(&self) -> Self {
        if self.quarter == 4 {
            Quarter {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Quarter {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// Buckets a monthly column label into its quarter.
    ///
    /// Accepts `YYYY-MM` and `YYYYMM`. A label that is already a quarter
    /// (`YYYYqN`) maps to itself, so an already-quarterly table passes
    /// through aggregation unchanged.
    pub fn from_month_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if let Ok(q) = label.parse::<Quarter>() {
            return Some(q);
        }
        if !label.is_ascii() {
            return None;
        }

        let (year, month) = match label.len() {
            7 if label.as_bytes()[4] == b'-' => (&label[..4], &label[5..]),
            6 => (&label[..4], &label[4..]),
            _ => return None,
        };

        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let year: u16 = year.parse().ok()?;
        let quarter = match month {
            "01" | "02" | "03" => 1,
            "04" | "05" | "06" => 2,
            "07" | "08" | "09" => 3,
            "10" | "11" | "12" => 4,
            _ => return None,
        };

        Quarter::new(year, quarter)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = ParseQuarterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQuarterError(s.to_string());
        let s = s.trim();

        let (year, quarter) = s.split_once('q').ok_or_else(err)?;
        if year.len() != 4 || quarter.len() != 1 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let year: u16 = year.parse().map_err(|_| err())?;
        let quarter: u8 = quarter.parse().map_err(|_| err())?;

        Quarter::new(year, quarter).ok_or_else(err)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quarter {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let quarter = q("2008q3");
        assert_eq!(quarter.year(), 2008);
        assert_eq!(quarter.quarter(), 3);
        assert_eq!(quarter.to_string(), "2008q3");
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        for bad in ["2008q5", "2008q0", "08q1", "2008Q1", "2008-01", "", "q1", "2008q12"] {
            assert!(bad.parse::<Quarter>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_parse_error_message() {
        let err = "2008Q1".parse::<Quarter>().unwrap_err();
        assert_eq!(err.to_string(), "'2008Q1' is not a quarter label");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(q("2008q4") < q("2009q1"));
        assert!(q("2009q1") < q("2009q2"));
        assert!(q("1999q4") < q("2000q1"));
    }

    #[test]
    fn test_next_rolls_over_year() {
        assert_eq!(q("2008q3").next(), q("2008q4"));
        assert_eq!(q("2008q4").next(), q("2009q1"));
    }

    #[test]
    fn test_month_bucketing_all_months() {
        let expected = [1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4];
        for year in [1999u16, 2000, 2009, 2010, 2016] {
            for (i, quarter) in expected.iter().enumerate() {
                let dashed = format!("{year}-{:02}", i + 1);
                let compact = format!("{year}{:02}", i + 1);
                let want = Quarter::new(year, *quarter).unwrap();
                assert_eq!(Quarter::from_month_label(&dashed), Some(want));
                assert_eq!(Quarter::from_month_label(&compact), Some(want));
            }
        }
    }

    #[test]
    fn test_month_bucketing_year_boundary() {
        assert_eq!(Quarter::from_month_label("200912"), Some(q("2009q4")));
        assert_eq!(Quarter::from_month_label("201001"), Some(q("2010q1")));
        assert_eq!(Quarter::from_month_label("2009-12"), Some(q("2009q4")));
        assert_eq!(Quarter::from_month_label("2010-01"), Some(q("2010q1")));
    }

    #[test]
    fn test_month_bucketing_accepts_quarter_labels() {
        assert_eq!(Quarter::from_month_label("2000q2"), Some(q("2000q2")));
    }

    #[test]
    fn test_month_bucketing_rejects_non_months() {
        for bad in ["2000-13", "200000", "SizeRank", "Metro", "2000/01", "20001"] {
            assert_eq!(Quarter::from_month_label(bad), None, "{bad}");
        }
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(serde_json::to_string(&q("2009q2")).unwrap(), "\"2009q2\"");
    }
}
