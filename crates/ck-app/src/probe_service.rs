//! Probe queries over the session's derived series, plus a headless
//! geometry and label measurer for use without a renderer.

use crate::error::AppResult;
use crate::session::Session;
use ck_core::{LabelId, finite_range};
use ck_probe::{
    Axis, DeclutterConfig, DeclutterReport, HAlign, LabelMeasurer, PixelRect, PlotGeometry, Probe,
    ProbeConfig, ProbeCurve, build_probe, run_declutter, vertical_bounds,
};
use tracing::{debug, warn};

/// Derived series of every curve, as the probe sees them. Stale curves
/// contribute empty series; recompute first.
pub fn probe_curves(session: &Session) -> Vec<ProbeCurve<'_>> {
    session
        .curves()
        .iter()
        .map(|r| ProbeCurve {
            curve: r.handle(),
            xs: r.modified_xs().unwrap_or_default(),
            ys: r.effective_ys().unwrap_or_default(),
            axis: if r.secondary_axis() {
                Axis::Secondary
            } else {
                Axis::Primary
            },
            visible: r.visible(),
        })
        .collect()
}

pub fn probe<G: PlotGeometry + ?Sized>(
    session: &mut Session,
    position_x: f64,
    geometry: &G,
    config: &ProbeConfig,
) -> AppResult<Probe> {
    if session.curves().needs_recompute() {
        session.recompute()?;
    }
    let probe = build_probe(position_x, probe_curves(session), geometry, config);
    debug!(x = position_x, labels = probe.labels.len(), "Probe built");
    Ok(probe)
}

/// Declutter the probe's labels. `None` when no visible curve has data.
pub fn layout_labels<G, M>(
    session: &Session,
    probe: &Probe,
    geometry: &G,
    measurer: &mut M,
    config: DeclutterConfig,
) -> Option<DeclutterReport>
where
    G: PlotGeometry + ?Sized,
    M: LabelMeasurer + ?Sized,
{
    let bounds = vertical_bounds(probe_curves(session), geometry)?;
    let report = run_declutter(&probe.label_ids(), bounds, config, measurer);
    if !report.is_clean() {
        warn!(diagnostics = ?report.diagnostics, "Label layout incomplete");
    }
    Some(report)
}

fn span(range: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = range;
    if hi > lo { (lo, hi - lo) } else { (lo - 0.5, 1.0) }
}

/// Affine mapping of the data extents onto a `width × height` pixel area,
/// Y growing downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGeometry {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub y2_range: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl LinearGeometry {
    /// Fit to the visible curves' derived series. `None` without data.
    pub fn fit(session: &Session, width: f64, height: f64) -> Option<Self> {
        let mut x: Option<(f64, f64)> = None;
        let mut y: Option<(f64, f64)> = None;
        let mut y2: Option<(f64, f64)> = None;
        let merge = |acc: &mut Option<(f64, f64)>, r: Option<(f64, f64)>| {
            if let Some((lo, hi)) = r {
                *acc = Some(acc.map_or((lo, hi), |(a, b)| (a.min(lo), b.max(hi))));
            }
        };
        for c in probe_curves(session).into_iter().filter(|c| c.visible) {
            merge(&mut x, finite_range(c.xs));
            match c.axis {
                Axis::Primary => merge(&mut y, finite_range(c.ys)),
                Axis::Secondary => merge(&mut y2, finite_range(c.ys)),
            }
        }
        let x = x?;
        let y = y.or(y2)?;
        Some(Self {
            x_range: x,
            y_range: y,
            y2_range: y2.unwrap_or(y),
            width,
            height,
        })
    }
}

impl PlotGeometry for LinearGeometry {
    fn pixel_x(&self, x: f64) -> f64 {
        let (lo, w) = span(self.x_range);
        (x - lo) / w * self.width
    }

    fn pixel_y(&self, y: f64, axis: Axis) -> f64 {
        let range = match axis {
            Axis::Primary => self.y_range,
            Axis::Secondary => self.y2_range,
        };
        let (lo, h) = span(range);
        self.height - (y - lo) / h * self.height
    }
}

/// Fixed-pitch text boxes sitting just above each label's marker.
pub struct FixedTextMeasurer<'a, G: ?Sized> {
    probe: &'a Probe,
    geometry: &'a G,
    pub char_width: f64,
    pub line_height: f64,
}

impl<'a, G: PlotGeometry + ?Sized> FixedTextMeasurer<'a, G> {
    pub fn new(probe: &'a Probe, geometry: &'a G) -> Self {
        Self {
            probe,
            geometry,
            char_width: 7.0,
            line_height: 16.0,
        }
    }
}

impl<G: PlotGeometry + ?Sized> LabelMeasurer for FixedTextMeasurer<'_, G> {
    fn measure(&mut self, label: LabelId, offset_y: f64) -> PixelRect {
        let Some(l) = self.probe.labels.iter().find(|l| l.id == label) else {
            return PixelRect::new(0.0, 0.0, 0.0, 0.0);
        };
        let px = self.geometry.pixel_x(l.x);
        let py = self.geometry.pixel_y(l.y, l.axis);
        let width = l.text.chars().count() as f64 * self.char_width;
        let left = match l.align {
            HAlign::Left => px,
            HAlign::Right => px - width,
        };
        PixelRect::from_origin_size(left, py - self.line_height + offset_y, width, self.line_height)
    }
}
