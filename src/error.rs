//! Error taxonomy for the analysis pipeline.

use thiserror::Error;

/// Errors raised while loading the input files or running the analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A two-letter code is not in the state table.
    #[error("unknown state code '{0}'")]
    UnknownCode(String),

    /// A town-list line could not be classified as header or town.
    #[error("malformed town list line {line}: {reason}")]
    MalformedInputLine { line: usize, reason: String },

    /// An input file does not match the configured layout.
    #[error("schema mismatch in {source_name}: {detail}")]
    SchemaMismatch { source_name: String, detail: String },

    /// The GDP series contains no two consecutive quarterly declines
    /// followed by a recovery.
    #[error("no recession found in GDP series")]
    NoRecessionFound,

    /// The t-test population is too small to estimate a variance.
    #[error("insufficient data for t-test: {0}")]
    InsufficientData(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn schema(source_name: &str, detail: impl Into<String>) -> Self {
        AnalysisError::SchemaMismatch {
            source_name: source_name.to_string(),
            detail: detail.into(),
        }
    }

    /// Short machine-readable tag, used for error records.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::UnknownCode(_) => "unknown_code",
            AnalysisError::MalformedInputLine { .. } => "malformed_input_line",
            AnalysisError::SchemaMismatch { .. } => "schema_mismatch",
            AnalysisError::NoRecessionFound => "no_recession_found",
            AnalysisError::InsufficientData(_) => "insufficient_data",
            AnalysisError::Spreadsheet(_) => "spreadsheet_error",
            AnalysisError::Csv(_) => "csv_error",
            AnalysisError::Io(_) => "io_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
