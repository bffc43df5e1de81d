//! Probe snapping: nearest sample per visible curve.

use crate::format::format_compact;
use crate::layout::VerticalBounds;
use ck_core::{CurveHandle, LabelId, finite_range};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    #[default]
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
}

/// Data → pixel mapping supplied by the renderer.
pub trait PlotGeometry {
    fn pixel_x(&self, x: f64) -> f64;
    fn pixel_y(&self, y: f64, axis: Axis) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeConfig {
    /// Snap distance as a fraction of the curve's X range.
    pub threshold_ratio: f64,
    /// Lower bound of the snap distance.
    pub threshold_floor: f64,
    /// Labels whose marker lies right of this fraction of the curve's
    /// maximum X pixel are right-aligned.
    pub right_align_fraction: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: 0.05,
            threshold_floor: 1e-6,
            right_align_fraction: 0.8,
        }
    }
}

/// A curve's derived series as seen by the probe.
#[derive(Clone, Copy, Debug)]
pub struct ProbeCurve<'a> {
    pub curve: CurveHandle,
    pub xs: &'a [f64],
    pub ys: &'a [f64],
    pub axis: Axis,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbeLabel {
    pub id: LabelId,
    pub curve: CurveHandle,
    pub sample: usize,
    pub x: f64,
    pub y: f64,
    pub axis: Axis,
    pub text: String,
    pub align: HAlign,
}

/// Markers and labels for one probe position. Rebuilt on every move.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Probe {
    pub position_x: f64,
    pub labels: Vec<ProbeLabel>,
}

impl Probe {
    pub fn label_ids(&self) -> Vec<LabelId> {
        self.labels.iter().map(|l| l.id).collect()
    }
}

/// Index of the sample closest to `x`.
///
/// Starts at the first sample at or past `x` (the last sample if none) and
/// steps back one when the previous sample is strictly closer, so ties keep
/// the later index. "Past" follows the series direction, so mirrored
/// (descending) X works too.
pub fn nearest_sample(xs: &[f64], x: f64) -> Option<usize> {
    let last = xs.len().checked_sub(1)?;
    let descending = xs[0] > xs[last];
    let mut idx = xs
        .iter()
        .position(|&v| if descending { v <= x } else { v >= x })
        .unwrap_or(last);
    if idx > 0 && (xs[idx] - x).abs() > (xs[idx - 1] - x).abs() {
        idx -= 1;
    }
    Some(idx)
}

/// `max(ratio · (max − min), floor)` over the finite samples of `xs`.
pub fn snap_threshold(xs: &[f64], config: &ProbeConfig) -> Option<f64> {
    let (min, max) = finite_range(xs)?;
    Some(((max - min).abs() * config.threshold_ratio).max(config.threshold_floor))
}

/// Label every visible curve whose nearest sample lies within its snap
/// threshold of `position_x`.
pub fn build_probe<'a, G: PlotGeometry + ?Sized>(
    position_x: f64,
    curves: impl IntoIterator<Item = ProbeCurve<'a>>,
    geometry: &G,
    config: &ProbeConfig,
) -> Probe {
    let mut labels = Vec::new();
    for curve in curves {
        if !curve.visible || curve.xs.is_empty() {
            continue;
        }
        let Some(idx) = nearest_sample(curve.xs, position_x) else {
            continue;
        };
        let Some(y) = curve.ys.get(idx).copied() else {
            continue;
        };
        let Some(threshold) = snap_threshold(curve.xs, config) else {
            continue;
        };
        let x = curve.xs[idx];
        if (x - position_x).abs() > threshold {
            debug!(curve = %curve.curve, distance = (x - position_x).abs(), threshold, "Probe too far from any sample");
            continue;
        }

        let max_x = curve.xs.iter().copied().fold(f64::MIN, f64::max);
        let align = if geometry.pixel_x(x) > geometry.pixel_x(max_x) * config.right_align_fraction {
            HAlign::Right
        } else {
            HAlign::Left
        };

        let Some(id) = LabelId::from_index(labels.len() as u32) else {
            break;
        };
        labels.push(ProbeLabel {
            id,
            curve: curve.curve,
            sample: idx,
            x,
            y,
            axis: curve.axis,
            text: format!("({}, {})", format_compact(x), format_compact(y)),
            align,
        });
    }
    Probe {
        position_x,
        labels,
    }
}

/// Pixel rows of the highest and lowest Y among visible curves, measured on
/// the primary axis.
pub fn vertical_bounds<'a, G: PlotGeometry + ?Sized>(
    curves: impl IntoIterator<Item = ProbeCurve<'a>>,
    geometry: &G,
) -> Option<VerticalBounds> {
    let mut range: Option<(f64, f64)> = None;
    for curve in curves.into_iter().filter(|c| c.visible) {
        let Some((lo, hi)) = finite_range(curve.ys) else {
            continue;
        };
        range = Some(match range {
            Some((a, b)) => (a.min(lo), b.max(hi)),
            None => (lo, hi),
        });
    }
    let (min_y, max_y) = range?;
    Some(VerticalBounds {
        top: geometry.pixel_y(max_y, Axis::Primary),
        bottom: geometry.pixel_y(min_y, Axis::Primary),
    })
}
