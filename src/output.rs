//! Rendering of run reports: the answer triple, a readable summary, JSON,
//! and the CSV run log.

use anyhow::{Result, bail};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::stats::RunReport;

/// Column order of the run log, matching the field order of [`RunReport`].
pub const RECORD_COLUMNS: &[&str] = &[
    "timestamp",
    "recession_start",
    "recession_bottom",
    "recession_end",
    "university_towns",
    "non_university_towns",
    "university_mean_ratio",
    "non_university_mean_ratio",
    "t_statistic",
    "degrees_of_freedom",
    "p_value",
    "different",
    "better",
    "error_type",
    "error_message",
];

/// The `(different, p, better)` answer, or `None` for a failed run.
pub fn answer_line(report: &RunReport) -> Option<String> {
    let (different, p, better) = report.answer()?;
    Some(format!("({different}, {p}, '{better}')"))
}

/// Multi-line summary of a run.
pub fn summary(report: &RunReport) -> String {
    if let (Some(kind), Some(message)) = (&report.error_type, &report.error_message) {
        return format!("analysis failed [{kind}]: {message}\n");
    }

    let quarter = |q: &Option<String>| q.as_deref().unwrap_or("?").to_string();
    let number = |v: Option<f64>| v.map_or_else(|| "?".to_string(), |v| format!("{v:.4}"));

    let mut out = format!(
        "recession: start {}, bottom {}, end {}\n",
        quarter(&report.recession_start),
        quarter(&report.recession_bottom),
        quarter(&report.recession_end),
    );
    out.push_str(&format!(
        "university towns: {} (mean ratio {})\n",
        report.university_towns,
        number(report.university_mean_ratio),
    ));
    out.push_str(&format!(
        "non-university towns: {} (mean ratio {})\n",
        report.non_university_towns,
        number(report.non_university_mean_ratio),
    ));
    out.push_str(&format!(
        "t = {}, df = {}, p = {}\n",
        number(report.t_statistic),
        number(report.degrees_of_freedom),
        report
            .p_value
            .map_or_else(|| "?".to_string(), |p| format!("{p:.3e}")),
    ));
    if let Some(answer) = answer_line(report) {
        out.push_str(&answer);
        out.push('\n');
    }
    out
}

/// Writes the summary, ending with the answer line.
pub fn write_summary<W: Write>(mut out: W, report: &RunReport) -> Result<()> {
    out.write_all(summary(report).as_bytes())?;
    Ok(())
}

/// Writes the report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, report: &RunReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Appends a [`RunReport`] as a row of the CSV run log.
///
/// A new (or empty) file gets the header first. An existing log whose header
/// differs from [`RECORD_COLUMNS`] is left untouched and reported as an error.
pub fn append_record(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    let needs_header = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };
    if !needs_header {
        check_header(path)?;
    }
    debug!(path = %path.display(), needs_header, "Appending run record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);

    writer.serialize(report)?;
    writer.flush()?;
    Ok(())
}

fn check_header(path: &Path) -> Result<()> {
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let header = reader.headers()?;
    if !header.iter().eq(RECORD_COLUMNS.iter().copied()) {
        bail!(
            "{} is not a run log (header: {})",
            path.display(),
            header.iter().collect::<Vec<_>>().join(",")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{
        AnalysisOutcome, HypothesisTestResult, RecessionWindow, TestStatistics, TownGroup,
    };
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn report() -> RunReport {
        RunReport::from_outcome(&AnalysisOutcome {
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
        })
    }

    #[test]
    fn test_answer_line() {
        assert_eq!(
            answer_line(&report()).as_deref(),
            Some("(true, 0.004, 'university town')")
        );
        assert_eq!(answer_line(&RunReport::from_error("io_error", "gone")), None);
    }

    #[test]
    fn test_summary_ends_with_answer() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &report()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("recession: start 2008q3, bottom 2009q2, end 2009q4\n"));
        assert!(text.contains("university towns: 4 (mean ratio 1.0300)"));
        assert!(text.contains("non-university towns: 8 (mean ratio 1.0700)"));
        assert_eq!(text.lines().last(), Some("(true, 0.004, 'university town')"));
    }

    #[test]
    fn test_summary_of_failed_run() {
        let text = summary(&RunReport::from_error("no_recession_found", "no recession"));
        assert_eq!(text, "analysis failed [no_recession_found]: no recession\n");
    }

    #[test]
    fn test_write_json_fields() {
        let mut buf = Vec::new();
        write_json(&mut buf, &report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["recession_bottom"], "2009q2");
        assert_eq!(value["different"], true);
        assert_eq!(value["better"], "university town");
        assert!(value["error_type"].is_null());
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("housing_recession_test_runlog.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &report()).unwrap();
        append_record(&path, &RunReport::from_error("csv_error", "bad row")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RECORD_COLUMNS.join(","));
        assert!(lines[1].contains(",2008q3,2009q2,2009q4,4,8,"));
        assert!(lines[2].ends_with("csv_error,bad row"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_refuses_foreign_csv() {
        let path = temp_path("housing_recession_test_foreign.csv");
        fs::write(&path, "RegionName,State\nAnn Arbor,MI\n").unwrap();

        assert!(append_record(&path, &report()).is_err());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "RegionName,State\nAnn Arbor,MI\n"
        );

        fs::remove_file(&path).unwrap();
    }
}
