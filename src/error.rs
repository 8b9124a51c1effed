use std::path::PathBuf;
use thiserror::Error;

/// The main error type for panconfig operations.
///
/// Translation-phase failures (source that does not parse, IR that cannot
/// be rendered) are not errors at this level: the plugin contracts require
/// those to be reported as structured diagnostics on the corresponding
/// result type. This enum covers the genuinely fatal cases: I/O, malformed
/// plugin registrations, invalid mapping definitions, and CLI-level failure
/// summaries.
#[derive(Debug, Error)]
pub enum PanconfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse IR JSON from {path}: {source}")]
    IrJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write IR JSON to {path}: {source}")]
    IrJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Invalid property path '{0}': expected one or more non-empty dot-separated segments")]
    InvalidPropertyPath(String),

    #[error("Invalid parser plugin '{language}': {reason}")]
    InvalidParser { language: String, reason: String },

    #[error("Invalid generator plugin '{language}': {reason}")]
    InvalidGenerator { language: String, reason: String },

    #[error("Translation from '{from}' to '{to}' failed with {error_count} error(s)")]
    TranslationFailed {
        from: String,
        to: String,
        error_count: usize,
    },

    #[error("Validation failed with {error_count} error(s)")]
    ValidationFailed { error_count: usize },

    #[error("Unsupported report format: {0}")]
    UnsupportedReportFormat(String),
}
