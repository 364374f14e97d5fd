//! Error types for rulelint

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Rulelint errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Table parse error: {0}")]
    TableParse(String),

    /// A finding references a rule id that is no longer in the table.
    /// The table was edited after analysis; the caller must re-analyze.
    #[error("Stale finding: rule '{0}' is not in the table")]
    StaleFinding(String),

    #[error("Finding has no applicable fix: {0}")]
    UnsupportedFix(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
