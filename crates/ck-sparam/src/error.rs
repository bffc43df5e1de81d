//! Network-parameter parsing errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for network-parameter parsing.
pub type SParamResult<T> = Result<T, SParamError>;

/// Errors that abort ingestion of one network-parameter file.
#[derive(Error, Debug)]
pub enum SParamError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported network-parameter extension: {ext:?}")]
    UnsupportedExtension { ext: String },

    /// A numeric token could not be parsed.
    #[error("Line {line}: cannot parse {token:?} as a number")]
    Parse { line: usize, token: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data row has fewer tokens than its position in the group requires.
    #[error("Line {line}: expected at least {expected} values, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl SParamError {
    /// 1-based source line the failure points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            SParamError::Parse { line, .. } | SParamError::ShortRow { line, .. } => Some(*line),
            SParamError::Csv(err) => err.position().map(|p| p.line() as usize),
            _ => None,
        }
    }
}
