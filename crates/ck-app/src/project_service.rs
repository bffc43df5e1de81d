//! Project save and restore.

use crate::error::AppResult;
use crate::session::{AxisLabels, Session};
use crate::source::{ParsedSource, read_source};
use ck_core::CurveHandle;
use ck_curves::{CurveRecord, CurveStyle, CurvesError, LineStyle, NewCurve, Rgba, content_identity};
use ck_project::{AppSettings, CurveConfig, ProjectConfig};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Why a saved curve was not restored.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// Neither the saved path nor the file name next to the project exists.
    MissingSource { path: Option<PathBuf> },
    /// The source exists but could not be parsed.
    Unreadable { message: String },
    /// No curve in the source hashes to the saved `HashId`.
    IdentityMismatch,
    AlreadyLoaded { existing: CurveHandle },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSource { path: Some(p) } => {
                write!(f, "data file not found: {}", p.display())
            }
            SkipReason::MissingSource { path: None } => write!(f, "no data file recorded"),
            SkipReason::Unreadable { message } => write!(f, "data file unreadable: {message}"),
            SkipReason::IdentityMismatch => write!(f, "data changed since the project was saved"),
            SkipReason::AlreadyLoaded { existing } => write!(f, "already loaded as curve {existing}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedCurve {
    pub name: String,
    pub hash_id: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestoreReport {
    pub settings: AppSettings,
    pub restored: Vec<CurveHandle>,
    pub skipped: Vec<SkippedCurve>,
}

fn curve_config(record: &CurveRecord, path: &Path) -> CurveConfig {
    let style = record.style();
    CurveConfig {
        name: record.name().to_string(),
        visible: record.visible(),
        width: style.width,
        opacity: style.opacity,
        line_style: style.line_style.label().to_string(),
        source_file_name: record.source_file_name().to_string(),
        source_file_full_path: path.display().to_string(),
        plot_color: style.color.to_argb().iter().map(|&c| i32::from(c)).collect(),
        marker_size: style.marker_size,
        x_magnitude: record.x_magnitude_exponent(),
        reverse_x: record.reverse_x(),
        smooth: i32::from(record.smooth_level()),
        hash_id: record.identity().as_str().to_string(),
        y2: record.secondary_axis(),
    }
}

/// Snapshot the session as a project. Curves without a source file (live
/// streams) cannot be re-read and are left out.
pub fn collect_config(session: &Session, base: &AppSettings) -> ProjectConfig {
    let labels = session.axis_labels();
    let settings = AppSettings {
        x_axis_label: labels.x.clone(),
        y_axis_label: labels.y.clone(),
        ..base.clone()
    };
    let curves = session
        .curves()
        .iter()
        .filter_map(|record| match record.source_path() {
            Some(path) if !record.is_stream() => Some(curve_config(record, path)),
            _ => {
                debug!(name = record.name(), "Curve has no source file, not saved");
                None
            }
        })
        .collect();
    ProjectConfig {
        app_settings: settings,
        curves,
    }
}

pub fn save_project(path: &Path, session: &Session, base: &AppSettings) -> AppResult<ProjectConfig> {
    let config = collect_config(session, base);
    ck_project::save_json(path, &config)?;
    info!(path = %path.display(), curves = config.curves.len(), "Project saved");
    Ok(config)
}

/// Where to re-read a saved curve from: the recorded path, else the bare
/// file name (relative to the working directory, then to the project).
fn locate_source(cfg: &CurveConfig, project_dir: Option<&Path>) -> Result<PathBuf, SkipReason> {
    let primary = cfg.data_path().map(PathBuf::from);
    let mut candidates: Vec<PathBuf> = primary.iter().cloned().collect();
    let file_name = cfg.source_file_name.trim();
    if !file_name.is_empty() {
        candidates.push(PathBuf::from(file_name));
        if let Some(dir) = project_dir {
            candidates.push(dir.join(file_name));
        }
    }
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .ok_or(SkipReason::MissingSource { path: primary })
}

fn restore_curve(
    session: &mut Session,
    cfg: &CurveConfig,
    path: &Path,
    source: &ParsedSource,
) -> Result<AppResult<CurveHandle>, SkipReason> {
    let Some(parsed) = source
        .curves
        .iter()
        .find(|c| content_identity(&c.ys).is_some_and(|id| id.as_str() == cfg.hash_id))
    else {
        return Err(SkipReason::IdentityMismatch);
    };

    let full_path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let new = NewCurve {
        visible: cfg.visible,
        ..NewCurve::new(cfg.name.clone(), parsed.xs.clone(), parsed.ys.clone()).from_source(full_path)
    };
    let handle = match session.curves_mut().insert(new) {
        Ok(handle) => handle,
        Err(CurvesError::DuplicateCurve { existing, .. }) => {
            return Err(SkipReason::AlreadyLoaded { existing });
        }
        Err(e) => return Ok(Err(e.into())),
    };
    Ok(apply_curve_settings(session, handle, cfg).map(|_| handle))
}

fn apply_curve_settings(session: &mut Session, handle: CurveHandle, cfg: &CurveConfig) -> AppResult<()> {
    let curves = session.curves_mut();
    let mut style = CurveStyle {
        width: cfg.width,
        opacity: cfg.opacity,
        line_style: LineStyle::from_label(&cfg.line_style),
        marker_size: cfg.marker_size,
        ..curves.get(handle).map(|r| r.style().clone()).unwrap_or_default()
    };
    if let Some(argb) = cfg.color_argb() {
        style.color = Rgba::from_argb(argb);
    }
    curves.set_style(handle, style)?;
    curves.set_x_magnitude_exponent(handle, cfg.x_magnitude)?;
    curves.set_reverse_x(handle, cfg.reverse_x)?;
    curves.set_smooth_level(handle, u8::try_from(cfg.smooth.max(0)).unwrap_or(u8::MAX))?;
    curves.set_secondary_axis(handle, cfg.y2)?;
    Ok(())
}

/// Restore a saved project into `session`.
///
/// Each curve is re-read from its data file and restored only if the file
/// still contains a curve with the saved identity. Missing files, parse
/// failures and identity mismatches are reported as skipped.
pub fn restore_project(session: &mut Session, path: &Path) -> AppResult<RestoreReport> {
    let config = ck_project::load_json(path)?;
    let project_dir = path.parent();
    let settings = config.app_settings;
    *session.axis_labels_mut() = AxisLabels {
        x: settings.x_axis_label.clone(),
        y: settings.y_axis_label.clone(),
    };

    let mut sources: HashMap<PathBuf, Result<ParsedSource, String>> = HashMap::new();
    let mut report = RestoreReport {
        settings: settings.clone(),
        restored: Vec::new(),
        skipped: Vec::new(),
    };

    for cfg in &config.curves {
        let outcome = locate_source(cfg, project_dir).and_then(|data_path| {
            let source = sources
                .entry(data_path.clone())
                .or_insert_with(|| read_source(&data_path).map_err(|e| e.to_string()));
            match source {
                Ok(source) => restore_curve(session, cfg, &data_path, source),
                Err(message) => Err(SkipReason::Unreadable {
                    message: message.clone(),
                }),
            }
        });
        match outcome {
            Ok(restored) => report.restored.push(restored?),
            Err(reason) => {
                warn!(name = %cfg.name, %reason, "Curve not restored");
                report.skipped.push(SkippedCurve {
                    name: cfg.name.clone(),
                    hash_id: cfg.hash_id.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        path = %path.display(),
        restored = report.restored.len(),
        skipped = report.skipped.len(),
        "Project restored"
    );
    Ok(report)
}
