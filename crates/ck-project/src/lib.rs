//! ck-project: saved project file format and validation.
//!
//! A project is a flat JSON document with PascalCase keys: axis/export
//! settings plus one entry per curve, keyed by the curve's content identity.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_project};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_json_str(content: &str) -> ProjectResult<ProjectConfig> {
    let project: ProjectConfig = serde_json::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn to_json_string(project: &ProjectConfig) -> ProjectResult<String> {
    validate_project(project)?;
    Ok(serde_json::to_string_pretty(project)?)
}

pub fn load_json(path: &Path) -> ProjectResult<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &Path, project: &ProjectConfig) -> ProjectResult<()> {
    let content = to_json_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}
