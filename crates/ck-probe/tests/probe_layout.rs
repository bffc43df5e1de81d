use ck_core::{Id, LabelId};
use ck_probe::{
    Axis, DeclutterConfig, LabelMeasurer, LayoutDiagnostic, PixelRect, PlotGeometry, ProbeConfig,
    ProbeCurve, VerticalBounds, build_probe, run_declutter,
};
use proptest::prelude::*;
use std::collections::HashMap;

struct Identity;

impl PlotGeometry for Identity {
    fn pixel_x(&self, x: f64) -> f64 {
        x
    }
    fn pixel_y(&self, y: f64, _axis: Axis) -> f64 {
        -y
    }
}

fn curve<'a>(index: u32, xs: &'a [f64], ys: &'a [f64]) -> ProbeCurve<'a> {
    ProbeCurve {
        curve: Id::from_index(index).unwrap(),
        xs,
        ys,
        axis: Axis::Primary,
        visible: true,
    }
}

#[test]
fn probe_suppression_uses_five_percent_of_range() {
    let far_xs = [0.0, 44.0, 100.0];
    let near_xs = [0.0, 46.0, 100.0];
    let ys = [1.0, 2.0, 3.0];

    let probe = build_probe(
        50.0,
        [curve(0, &far_xs, &ys), curve(1, &near_xs, &ys)],
        &Identity,
        &ProbeConfig::default(),
    );

    assert_eq!(probe.labels.len(), 1);
    assert_eq!(probe.labels[0].curve, Id::from_index(1).unwrap());
    assert_eq!(probe.labels[0].x, 46.0);
    assert_eq!(probe.labels[0].text, "(46, 2)");
}

/// Labels keep a fixed anchor row; the renderer clamps them inside
/// `[floor, ceiling]`.
struct Viewport {
    anchors: HashMap<LabelId, f64>,
    height: f64,
    ceiling: f64,
    floor: f64,
}

impl LabelMeasurer for Viewport {
    fn measure(&mut self, label: LabelId, offset_y: f64) -> PixelRect {
        let top = (self.anchors[&label] + offset_y)
            .max(self.ceiling)
            .min(self.floor - self.height);
        PixelRect::new(0.0, top, 120.0, top + self.height)
    }
}

fn ids(n: u32) -> Vec<LabelId> {
    (0..n).map(|i| Id::from_index(i).unwrap()).collect()
}

#[test]
fn two_labels_overlapping_by_less_than_a_step_resolve() {
    let labels = ids(2);
    let mut viewport = Viewport {
        anchors: [(labels[0], 112.0), (labels[1], 100.0)].into_iter().collect(),
        height: 20.0,
        ceiling: 0.0,
        floor: 1000.0,
    };
    let bounds = VerticalBounds {
        top: 50.0,
        bottom: 500.0,
    };

    let report = run_declutter(&labels, bounds, DeclutterConfig::default(), &mut viewport);

    assert!(report.is_clean(), "{:?}", report.diagnostics);
    let a = report.placement(labels[0]).unwrap();
    let b = report.placement(labels[1]).unwrap();
    assert!(!a.rect.overlaps(&b.rect));
    assert_eq!(a.offset_y, 10.0);
    assert_eq!(b.offset_y, 0.0);
}

#[test]
fn crowded_plot_stops_at_bound_and_reports_overlap() {
    let labels = ids(40);
    let mut viewport = Viewport {
        anchors: labels.iter().map(|&l| (l, 60.0)).collect(),
        height: 20.0,
        ceiling: 0.0,
        floor: 300.0,
    };
    let bounds = VerticalBounds {
        top: 50.0,
        bottom: 300.0,
    };
    let config = DeclutterConfig::default();

    let report = run_declutter(&labels, bounds, config, &mut viewport);

    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, LayoutDiagnostic::BoundExceeded { nudges: 50, .. })));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, LayoutDiagnostic::OverlapResidual { .. })));
    // Initial pass plus at most max_nudges per label.
    assert!(report.measurements <= labels.len() * (1 + config.max_nudges as usize));
    assert_eq!(report.placements.len(), labels.len());
}

/// Labels in `stuck` ignore their offset, as when the renderer has no room
/// left to move them.
struct PartlyStuck {
    anchors: HashMap<LabelId, f64>,
    stuck: Vec<LabelId>,
}

impl LabelMeasurer for PartlyStuck {
    fn measure(&mut self, label: LabelId, offset_y: f64) -> PixelRect {
        let top = if self.stuck.contains(&label) {
            self.anchors[&label]
        } else {
            self.anchors[&label] + offset_y
        };
        PixelRect::new(0.0, top, 120.0, top + 20.0)
    }
}

#[test]
fn lower_half_is_walked_after_upper_half_gives_up() {
    let labels = ids(4);
    let mut measurer = PartlyStuck {
        anchors: [
            (labels[0], 60.0),
            (labels[1], 60.0),
            (labels[2], 480.0),
            (labels[3], 470.0),
        ]
        .into_iter()
        .collect(),
        stuck: vec![labels[0], labels[1]],
    };
    let bounds = VerticalBounds {
        top: 50.0,
        bottom: 500.0,
    };

    let report = run_declutter(&labels, bounds, DeclutterConfig::default(), &mut measurer);

    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, LayoutDiagnostic::BoundExceeded { nudges: 50, .. })));
    let low = report.placement(labels[2]).unwrap();
    let high = report.placement(labels[3]).unwrap();
    assert_eq!(low.offset_y, 0.0);
    assert_eq!(high.offset_y, -10.0);
    assert!(!low.rect.overlaps(&high.rect));
    assert!(!report.diagnostics.iter().any(|d| matches!(
        d,
        LayoutDiagnostic::OverlapResidual { first, second }
            if [*first, *second].contains(&labels[2]) || [*first, *second].contains(&labels[3])
    )));
}

proptest! {
    #[test]
    fn declutter_always_terminates(
        anchors in proptest::collection::vec(0.0f64..400.0, 0..25),
        step in 1.0f64..30.0,
        max_nudges in 0u32..60,
    ) {
        let labels = ids(anchors.len() as u32);
        let mut viewport = Viewport {
            anchors: labels.iter().copied().zip(anchors.iter().copied()).collect(),
            height: 18.0,
            ceiling: 0.0,
            floor: 400.0,
        };
        let bounds = VerticalBounds { top: 20.0, bottom: 380.0 };
        let config = DeclutterConfig { push_step: step, max_nudges };

        let report = run_declutter(&labels, bounds, config, &mut viewport);

        prop_assert_eq!(report.placements.len(), labels.len());
        prop_assert!(report.measurements <= labels.len() * (1 + max_nudges as usize));
        if report.is_clean() {
            for (i, a) in report.placements.iter().enumerate() {
                for b in &report.placements[i + 1..] {
                    prop_assert!(!a.rect.overlaps(&b.rect));
                }
            }
        }
    }
}
