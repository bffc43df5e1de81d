//! ck-probe: probe snapping and label layout.
//!
//! The renderer stays outside this crate. It is reached through two traits:
//! [`PlotGeometry`] maps data coordinates to pixels and [`LabelMeasurer`]
//! reports where a label ended up after it was drawn at a given offset.

pub mod format;
pub mod layout;
pub mod probe;
pub mod rect;

pub use format::format_compact;
pub use layout::{
    Declutter, DeclutterConfig, DeclutterReport, DeclutterStep, LabelMeasurer, LabelPlacement,
    LayoutDiagnostic, VerticalBounds, run_declutter,
};
pub use probe::{
    Axis, HAlign, PlotGeometry, Probe, ProbeConfig, ProbeCurve, ProbeLabel, build_probe,
    nearest_sample, snap_threshold, vertical_bounds,
};
pub use rect::PixelRect;
