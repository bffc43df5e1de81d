//! Error types for the ck-app service layer.

use std::path::PathBuf;

/// Errors surfaced to the CLI. Duplicate curves are not errors here; they
/// become [`crate::Notice`]s.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported file type {ext:?}: {path}")]
    UnsupportedFile { path: PathBuf, ext: String },

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    SParam {
        path: PathBuf,
        source: ck_sparam::SParamError,
    },

    #[error("{path}: {source}")]
    Table {
        path: PathBuf,
        source: ck_loader::LoaderError,
    },

    #[error(transparent)]
    Curves(#[from] ck_curves::CurvesError),

    #[error("Project error: {0}")]
    Project(String),

    #[error("No curve named {0:?}")]
    CurveNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ck-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ck_project::ProjectError> for AppError {
    fn from(err: ck_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}
