//! Table loading errors.

use std::path::PathBuf;
use thiserror::Error;

pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors that abort loading of one table file.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A token inside the data range is not a number.
    #[error("Line {line}: cannot parse {token:?} as a number")]
    Parse { line: usize, token: String },

    #[error("Line {line}: expected {expected} columns, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("No data: {reason}")]
    NoData { reason: &'static str },
}
