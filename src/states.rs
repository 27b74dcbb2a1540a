//! Two-letter postal code to state/territory name lookup.

use crate::error::{AnalysisError, Result};

/// Postal codes used by the housing data, including territories and the
/// `NA` national aggregate.
static STATES: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AS", "American Samoa"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MP", "Northern Mariana Islands"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NA", "National"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VI", "Virgin Islands"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
];

/// Returns the full name for a two-letter code.
///
/// # Errors
///
/// Returns [`AnalysisError::UnknownCode`] if the code is not in the table.
pub fn state_name(code: &str) -> Result<&'static str> {
    STATES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .ok_or_else(|| AnalysisError::UnknownCode(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(state_name("MI").unwrap(), "Michigan");
        assert_eq!(state_name("DC").unwrap(), "District of Columbia");
        assert_eq!(state_name("VI").unwrap(), "Virgin Islands");
        assert_eq!(state_name("NA").unwrap(), "National");
    }

    #[test]
    fn test_unknown_code() {
        let err = state_name("ZZ").unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownCode(ref c) if c == "ZZ"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(state_name("mi").is_err());
    }

    #[test]
    fn test_table_has_no_duplicate_codes() {
        let mut codes: Vec<_> = STATES.iter().map(|(c, _)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), STATES.len());
        assert_eq!(STATES.len(), 57);
    }
}
