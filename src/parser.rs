//! Parser for the university town list.
//!
//! The list is plain text: a state header line ends with `[edit]`, and
//! every other line names a town in the most recent state, optionally
//! followed by a parenthesised note.

use tracing::{debug, warn};

use crate::analyzers::types::TownRecord;
use crate::error::{AnalysisError, Result};

const HEADER_MARKER: &str = "[edit]";
const ANNOTATION_START: &str = " (";

enum Line<'a> {
    Header(&'a str),
    Town(&'a str),
    Blank,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(state) = line.strip_suffix(HEADER_MARKER) {
        return Line::Header(state);
    }
    if line.trim().is_empty() {
        return Line::Blank;
    }
    match line.find(ANNOTATION_START) {
        Some(idx) => Line::Town(&line[..idx]),
        None => Line::Town(line),
    }
}

/// Parses the town list into `(state, town)` records in file order.
///
/// Towns listed before the first header get `state = None`. Blank lines
/// are skipped and produce no record, so the record count can be lower
/// than the number of non-header lines.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedInputLine`] for a header with no state name.
pub fn parse_university_towns(text: &str) -> Result<Vec<TownRecord>> {
    let (_, records) = text.lines().enumerate().try_fold(
        (None::<String>, Vec::new()),
        |(state, mut records), (idx, raw)| {
            let line_no = idx + 1;
            match classify(raw.trim_end_matches('\r')) {
                Line::Header(name) if name.trim().is_empty() => {
                    Err(AnalysisError::MalformedInputLine {
                        line: line_no,
                        reason: "state header has no name".to_string(),
                    })
                }
                Line::Header(name) => Ok((Some(name.to_string()), records)),
                Line::Blank => {
                    warn!(line = line_no, "Skipping blank line in town list");
                    Ok((state, records))
                }
                Line::Town(town) => {
                    if state.is_none() {
                        warn!(line = line_no, town, "Town listed before any state header");
                    }
                    records.push(TownRecord {
                        state: state.clone(),
                        region: town.to_string(),
                    });
                    Ok((state, records))
                }
            }
        },
    )?;

    debug!(towns = records.len(), "Parsed university town list");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_michigan_fixture() {
        let text = "Michigan[edit]\nAnn Arbor (a college town)\nYipsilanti\n";
        let towns = parse_university_towns(text).unwrap();

        assert_eq!(
            towns,
            vec![
                TownRecord::new("Michigan", "Ann Arbor"),
                TownRecord::new("Michigan", "Yipsilanti"),
            ]
        );
    }

    #[test]
    fn test_parse_preserves_order_and_count() {
        let text = "Alabama[edit]\n\
                    Auburn (Auburn University)[1]\n\
                    Florence (University of North Alabama)\n\
                    Alaska[edit]\n\
                    Fairbanks (University of Alaska Fairbanks)[2]\n\
                    Alabama[edit]\n\
                    Auburn (again)\n";
        let towns = parse_university_towns(text).unwrap();

        let got: Vec<_> = towns
            .iter()
            .map(|t| (t.state.as_deref().unwrap(), t.region.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Alabama", "Auburn"),
                ("Alabama", "Florence"),
                ("Alaska", "Fairbanks"),
                ("Alabama", "Auburn"),
            ]
        );
    }

    #[test]
    fn test_town_before_header_has_no_state() {
        let towns = parse_university_towns("Orphanville\nOhio[edit]\nAthens\n").unwrap();

        assert_eq!(towns.len(), 2);
        assert_eq!(towns[0].state, None);
        assert_eq!(towns[0].region, "Orphanville");
        assert_eq!(towns[1].state.as_deref(), Some("Ohio"));
    }

    #[test]
    fn test_parenthesis_without_space_is_kept() {
        let towns = parse_university_towns("Texas[edit]\nCollege Station(TAMU)\n").unwrap();
        assert_eq!(towns[0].region, "College Station(TAMU)");
    }

    #[test]
    fn test_crlf_line_endings() {
        let towns = parse_university_towns("Iowa[edit]\r\nAmes (ISU)\r\nGrinnell\r\n").unwrap();
        assert_eq!(
            towns,
            vec![
                TownRecord::new("Iowa", "Ames"),
                TownRecord::new("Iowa", "Grinnell"),
            ]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "Utah[edit]\n\nLogan\n   \nProvo\n";
        let towns = parse_university_towns(text).unwrap();

        let non_header = text.lines().filter(|l| !l.ends_with("[edit]")).count();
        assert_eq!(non_header, 4);
        assert_eq!(towns.len(), 2);
    }

    #[test]
    fn test_header_without_name_is_malformed() {
        let err = parse_university_towns("Utah[edit]\nLogan\n[edit]\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInputLine { line: 3, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_university_towns("").unwrap().is_empty());
    }
}
