//! The curve entity and its derived-value cache.

use crate::identity::CurveIdentity;
use crate::style::CurveStyle;
use ck_core::CurveHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const MAX_SMOOTH_LEVEL: u8 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[default]
    None,
    Subtract,
}

/// Input for [`crate::CurveSet::insert`].
#[derive(Clone, Debug, Default)]
pub struct NewCurve {
    pub name: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub source_path: Option<PathBuf>,
    pub visible: bool,
    pub is_stream: bool,
}

impl NewCurve {
    pub fn new(name: impl Into<String>, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            xs,
            ys,
            source_path: None,
            visible: true,
            is_stream: false,
        }
    }

    pub fn from_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn stream(mut self) -> Self {
        self.is_stream = true;
        self
    }
}

/// One loaded curve.
///
/// Raw samples change only through [`crate::CurveSet::update_curve_data`] or
/// stream appends. `modified_xs` and `effective_ys` are `None` while stale.
#[derive(Clone, Debug)]
pub struct CurveRecord {
    pub(crate) handle: CurveHandle,
    pub(crate) identity: CurveIdentity,
    pub(crate) name: String,
    pub(crate) raw_xs: Vec<f64>,
    pub(crate) raw_ys: Vec<f64>,
    pub(crate) is_stream: bool,
    pub(crate) source_path: Option<PathBuf>,

    pub(crate) visible: bool,
    pub(crate) style: CurveStyle,
    pub(crate) secondary_axis: bool,

    pub(crate) x_magnitude_exponent: i32,
    pub(crate) reverse_x: bool,
    pub(crate) smooth_level: u8,
    pub(crate) operation: OperationKind,
    pub(crate) target: Option<CurveIdentity>,

    pub(crate) other_curve_ids: BTreeSet<CurveIdentity>,
    pub(crate) operation_enabled: bool,
    pub(crate) target_enabled: bool,

    pub(crate) original_ys: Option<Vec<f64>>,
    pub(crate) modified_xs: Option<Vec<f64>>,
    pub(crate) effective_ys: Option<Vec<f64>>,
}

impl CurveRecord {
    pub(crate) fn new(
        handle: CurveHandle,
        identity: CurveIdentity,
        name: String,
        curve: NewCurve,
        style: CurveStyle,
    ) -> Self {
        Self {
            handle,
            identity,
            name,
            raw_xs: curve.xs,
            raw_ys: curve.ys,
            is_stream: curve.is_stream,
            source_path: curve.source_path,
            visible: curve.visible,
            style,
            secondary_axis: false,
            x_magnitude_exponent: 0,
            reverse_x: false,
            smooth_level: 0,
            operation: OperationKind::None,
            target: None,
            other_curve_ids: BTreeSet::new(),
            operation_enabled: true,
            target_enabled: true,
            original_ys: None,
            modified_xs: None,
            effective_ys: None,
        }
    }

    pub fn handle(&self) -> CurveHandle {
        self.handle
    }

    pub fn identity(&self) -> &CurveIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_xs(&self) -> &[f64] {
        &self.raw_xs
    }

    pub fn raw_ys(&self) -> &[f64] {
        &self.raw_ys
    }

    pub fn len(&self) -> usize {
        self.raw_xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_xs.is_empty()
    }

    pub fn is_stream(&self) -> bool {
        self.is_stream
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// File name of the source, or `""` for curves without one.
    pub fn source_file_name(&self) -> &str {
        self.source_path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn style(&self) -> &CurveStyle {
        &self.style
    }

    pub fn secondary_axis(&self) -> bool {
        self.secondary_axis
    }

    pub fn x_magnitude_exponent(&self) -> i32 {
        self.x_magnitude_exponent
    }

    pub fn reverse_x(&self) -> bool {
        self.reverse_x
    }

    pub fn smooth_level(&self) -> u8 {
        self.smooth_level
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn target(&self) -> Option<&CurveIdentity> {
        self.target.as_ref()
    }

    /// Curves with the same sample count, eligible as subtraction targets.
    pub fn other_curve_ids(&self) -> &BTreeSet<CurveIdentity> {
        &self.other_curve_ids
    }

    /// False while this curve is some other curve's subtraction target.
    pub fn operation_enabled(&self) -> bool {
        self.operation_enabled
    }

    pub fn target_enabled(&self) -> bool {
        self.target_enabled
    }

    /// Cached X series, `None` until the next recompute.
    pub fn modified_xs(&self) -> Option<&[f64]> {
        self.modified_xs.as_deref()
    }

    /// Cached Y series, `None` until the next recompute.
    pub fn effective_ys(&self) -> Option<&[f64]> {
        self.effective_ys.as_deref()
    }

    pub fn is_stale(&self) -> bool {
        self.modified_xs.is_none() || self.effective_ys.is_none()
    }

    /// Y values the operation stage starts from. Snapshotted on first use.
    pub(crate) fn snapshot_original(&mut self) {
        if self.original_ys.is_none() {
            self.original_ys = Some(self.raw_ys.clone());
        }
    }

    pub(crate) fn original_ys(&self) -> &[f64] {
        self.original_ys.as_deref().unwrap_or(&self.raw_ys)
    }

    /// Drop the operation and its target; the Y cache goes stale.
    pub(crate) fn clear_operation(&mut self) {
        self.operation = OperationKind::None;
        self.target = None;
        self.effective_ys = None;
    }

    pub(crate) fn replace_data(&mut self, xs: Vec<f64>, ys: Vec<f64>) {
        self.raw_xs = xs;
        self.raw_ys = ys;
        self.original_ys = None;
        self.modified_xs = None;
        self.effective_ys = None;
    }
}
