//! The session: sole owner and writer of the curve set.

use crate::error::{AppError, AppResult};
use crate::source::{ParsedSource, SourceKind, read_source};
use ck_core::CurveHandle;
use ck_curves::{
    CurveIdentity, CurveSet, CurvesError, NewCurve, RecomputeReport, StreamAppend,
};
use ck_ingest::StreamSample;
use ck_kernel::SmoothingConfig;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::{info, warn};

pub const DEFAULT_X_LABEL: &str = "X";
pub const DEFAULT_Y_LABEL: &str = "Y";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl Default for AxisLabels {
    fn default() -> Self {
        Self {
            x: DEFAULT_X_LABEL.to_string(),
            y: DEFAULT_Y_LABEL.to_string(),
        }
    }
}

impl AxisLabels {
    /// Adopt header names, but never over a label the user already changed.
    pub fn suggest(&mut self, x: &str, y: &str) {
        if self.x == DEFAULT_X_LABEL && !x.is_empty() {
            self.x = x.to_string();
        }
        if self.y == DEFAULT_Y_LABEL && !y.is_empty() {
            self.y = y.to_string();
        }
    }
}

/// Something the user should see once, then dismiss.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    DuplicateCurve {
        name: String,
        identity: CurveIdentity,
        existing: CurveHandle,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadSummary {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub added: Vec<CurveHandle>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Default)]
pub struct Session {
    curves: CurveSet,
    axis_labels: AxisLabels,
}

impl Session {
    pub fn new(smoothing: SmoothingConfig) -> Self {
        Self {
            curves: CurveSet::new(smoothing),
            axis_labels: AxisLabels::default(),
        }
    }

    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    pub fn curves_mut(&mut self) -> &mut CurveSet {
        &mut self.curves
    }

    pub fn axis_labels(&self) -> &AxisLabels {
        &self.axis_labels
    }

    pub fn axis_labels_mut(&mut self) -> &mut AxisLabels {
        &mut self.axis_labels
    }

    pub fn curve_by_name(&self, name: &str) -> AppResult<CurveHandle> {
        self.curves
            .find_by_name(name)
            .map(|r| r.handle())
            .ok_or_else(|| AppError::CurveNotFound(name.to_string()))
    }

    /// Parse a file and add its curves. A parse failure adds nothing.
    pub fn load_file(&mut self, path: &Path) -> AppResult<LoadSummary> {
        let source = read_source(path)?;
        let summary = self.add_source(path, source)?;
        info!(
            path = %path.display(),
            added = summary.added.len(),
            duplicates = summary.notices.len(),
            "File loaded"
        );
        Ok(summary)
    }

    pub(crate) fn add_source(&mut self, path: &Path, source: ParsedSource) -> AppResult<LoadSummary> {
        let full_path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let mut summary = LoadSummary {
            path: full_path.clone(),
            kind: source.kind,
            added: Vec::new(),
            notices: Vec::new(),
        };
        for curve in source.curves {
            let new = NewCurve {
                visible: curve.visible,
                ..NewCurve::new(curve.label, curve.xs, curve.ys).from_source(full_path.clone())
            };
            let name = new.name.clone();
            match self.curves.insert(new) {
                Ok(handle) => summary.added.push(handle),
                Err(CurvesError::DuplicateCurve { identity, existing }) => {
                    summary.notices.push(Notice::DuplicateCurve {
                        name,
                        identity,
                        existing,
                    });
                }
                Err(e) => {
                    warn!(path = %full_path.display(), error = %e, "Rolling back partial load");
                    for handle in summary.added.drain(..).rev() {
                        self.curves.remove_curve(handle)?;
                    }
                    return Err(e.into());
                }
            }
        }
        if let Some((x, y)) = &source.axis_labels {
            self.axis_labels.suggest(x, y);
        }
        Ok(summary)
    }

    pub fn apply_sample(&mut self, sample: &StreamSample) -> AppResult<StreamAppend> {
        Ok(self
            .curves
            .append_stream_sample(&sample.id, sample.x, sample.y)?)
    }

    /// Apply every sample already queued by the listener. Returns how many
    /// were applied; a disconnected channel just ends the drain.
    pub fn drain_stream(&mut self, samples: &Receiver<StreamSample>) -> AppResult<usize> {
        let mut applied = 0;
        loop {
            match samples.try_recv() {
                Ok(sample) => {
                    self.apply_sample(&sample)?;
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(applied)
    }

    /// Run the curve set's recompute pass, logging what it had to clear.
    pub fn recompute(&mut self) -> AppResult<RecomputeReport> {
        let report = self.curves.recompute()?;
        for diagnostic in &report.diagnostics {
            warn!(curve = %diagnostic.curve(), ?diagnostic, "Operation cleared");
        }
        Ok(report)
    }

    /// Derived series of one curve, recomputing first when needed.
    pub fn series(&mut self, handle: CurveHandle) -> AppResult<(&[f64], &[f64])> {
        Ok(self.curves.series(handle)?)
    }
}
