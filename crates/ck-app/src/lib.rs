//! Shared application service layer for curvekit.
//!
//! The [`Session`] owns the curve set and is its only writer: files, live
//! stream samples and restored projects all enter through it.

pub mod error;
pub mod probe_service;
pub mod project_service;
pub mod session;
pub mod source;

pub use error::{AppError, AppResult};
pub use probe_service::{FixedTextMeasurer, LinearGeometry, layout_labels, probe, probe_curves};
pub use project_service::{
    RestoreReport, SkipReason, SkippedCurve, collect_config, restore_project, save_project,
};
pub use session::{AxisLabels, LoadSummary, Notice, Session};
pub use source::{ParsedCurve, ParsedSource, SourceKind, read_source};
