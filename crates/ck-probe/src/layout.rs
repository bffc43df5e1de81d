//! Label declutter.
//!
//! Labels are split at the vertical midpoint of the plotted data. The upper
//! half is walked top-down: each label is pushed down until its top clears
//! the plot top (first label) or the previous label's bottom. The lower half
//! mirrors this from the bottom, pushing up. Every push needs a fresh
//! measurement from the renderer, so [`Declutter`] is a state machine that
//! suspends with [`DeclutterStep::Measure`] and continues on
//! [`Declutter::resume`].

use crate::rect::PixelRect;
use ck_core::LabelId;
use std::cmp::Ordering;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeclutterConfig {
    /// Pixels per nudge.
    pub push_step: f64,
    /// Nudges allowed per label before the walk gives up.
    pub max_nudges: u32,
}

impl Default for DeclutterConfig {
    fn default() -> Self {
        Self {
            push_step: 10.0,
            max_nudges: 50,
        }
    }
}

/// Pixel rows of the highest (`top`) and lowest (`bottom`) plotted data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalBounds {
    pub top: f64,
    pub bottom: f64,
}

impl VerticalBounds {
    pub fn midpoint(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Renders a label at a vertical offset and reports its rectangle.
pub trait LabelMeasurer {
    fn measure(&mut self, label: LabelId, offset_y: f64) -> PixelRect;
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutDiagnostic {
    /// A label needed more than `max_nudges` pushes; the walk of its half
    /// stopped there.
    BoundExceeded { label: LabelId, nudges: u32 },
    /// Two labels still intersect after the walk.
    OverlapResidual { first: LabelId, second: LabelId },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    pub label: LabelId,
    pub offset_y: f64,
    pub rect: PixelRect,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclutterReport {
    pub placements: Vec<LabelPlacement>,
    pub diagnostics: Vec<LayoutDiagnostic>,
    pub measurements: usize,
}

impl DeclutterReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn placement(&self, label: LabelId) -> Option<&LabelPlacement> {
        self.placements.iter().find(|p| p.label == label)
    }
}

#[derive(Clone, Debug)]
pub enum DeclutterStep {
    /// Render `label` at `offset_y` and pass its rectangle to `resume`.
    Measure { label: LabelId, offset_y: f64 },
    Finished(DeclutterReport),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Half {
    Upper,
    Lower,
}

#[derive(Clone, Debug)]
enum Phase {
    /// Initial measurement of label `next` at offset 0.
    Initial { next: usize },
    /// Walking `order` (label indices) of one half; `pos` is the label in
    /// progress.
    Walk {
        half: Half,
        order: Vec<usize>,
        pos: usize,
        lower: Vec<usize>,
    },
    Done,
}

#[derive(Clone, Debug)]
struct LabelState {
    id: LabelId,
    offset_y: f64,
    rect: PixelRect,
    nudges: u32,
}

#[derive(Clone, Debug)]
pub struct Declutter {
    config: DeclutterConfig,
    bounds: VerticalBounds,
    labels: Vec<LabelState>,
    phase: Phase,
    /// Label index whose measurement is outstanding.
    awaiting: Option<usize>,
    diagnostics: Vec<LayoutDiagnostic>,
    measurements: usize,
}

impl Declutter {
    pub fn new(labels: &[LabelId], bounds: VerticalBounds, config: DeclutterConfig) -> Self {
        let empty = PixelRect::new(0.0, 0.0, 0.0, 0.0);
        Self {
            config,
            bounds,
            labels: labels
                .iter()
                .map(|&id| LabelState {
                    id,
                    offset_y: 0.0,
                    rect: empty,
                    nudges: 0,
                })
                .collect(),
            phase: Phase::Initial { next: 0 },
            awaiting: None,
            diagnostics: Vec::new(),
            measurements: 0,
        }
    }

    /// First step: every label is measured at offset 0.
    pub fn start(&mut self) -> DeclutterStep {
        self.advance()
    }

    /// Feed the rectangle for the last requested measurement.
    pub fn resume(&mut self, rect: PixelRect) -> DeclutterStep {
        match self.awaiting.take() {
            Some(i) => {
                self.labels[i].rect = rect;
                self.measurements += 1;
            }
            None => debug!("Declutter resumed without a pending measurement"),
        }
        self.advance()
    }

    fn request(&mut self, i: usize) -> DeclutterStep {
        self.awaiting = Some(i);
        DeclutterStep::Measure {
            label: self.labels[i].id,
            offset_y: self.labels[i].offset_y,
        }
    }

    fn advance(&mut self) -> DeclutterStep {
        loop {
            match &mut self.phase {
                Phase::Initial { next } => {
                    if *next < self.labels.len() {
                        let i = *next;
                        *next += 1;
                        return self.request(i);
                    }
                    let (upper, lower) = self.partition();
                    self.phase = Phase::Walk {
                        half: Half::Upper,
                        order: upper,
                        pos: 0,
                        lower,
                    };
                }
                Phase::Walk {
                    half,
                    order,
                    pos,
                    lower,
                } => {
                    let Some(&i) = order.get(*pos) else {
                        self.next_half();
                        continue;
                    };
                    let half = *half;
                    let previous = pos.checked_sub(1).map(|p| order[p]);

                    if !self.blocked(half, i, previous) {
                        if let Phase::Walk { pos, .. } = &mut self.phase {
                            *pos += 1;
                        }
                        continue;
                    }

                    let label = &mut self.labels[i];
                    if label.nudges >= self.config.max_nudges {
                        warn!(
                            label = %label.id,
                            nudges = label.nudges,
                            ?half,
                            "Declutter bound exceeded, leaving the rest of this half as is"
                        );
                        self.diagnostics.push(LayoutDiagnostic::BoundExceeded {
                            label: label.id,
                            nudges: label.nudges,
                        });
                        self.next_half();
                        continue;
                    }
                    label.nudges += 1;
                    label.offset_y += match half {
                        Half::Upper => self.config.push_step,
                        Half::Lower => -self.config.push_step,
                    };
                    return self.request(i);
                }
                Phase::Done => return DeclutterStep::Finished(self.finish()),
            }
        }
    }

    /// Halves are walked independently: upper, then lower, then done.
    fn next_half(&mut self) {
        self.phase = match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::Walk {
                half: Half::Upper,
                lower,
                ..
            } => Phase::Walk {
                half: Half::Lower,
                order: lower,
                pos: 0,
                lower: Vec::new(),
            },
            _ => Phase::Done,
        };
    }

    /// Upper half sorted by ascending top, lower half by descending bottom.
    fn partition(&self) -> (Vec<usize>, Vec<usize>) {
        let mid = self.bounds.midpoint();
        let (mut upper, mut lower): (Vec<usize>, Vec<usize>) =
            (0..self.labels.len()).partition(|&i| self.labels[i].rect.top <= mid);
        upper.sort_by(|&a, &b| {
            self.labels[a]
                .rect
                .top
                .partial_cmp(&self.labels[b].rect.top)
                .unwrap_or(Ordering::Equal)
        });
        lower.sort_by(|&a, &b| {
            self.labels[b]
                .rect
                .bottom
                .partial_cmp(&self.labels[a].rect.bottom)
                .unwrap_or(Ordering::Equal)
        });
        (upper, lower)
    }

    /// Whether label `i` still crosses its boundary.
    fn blocked(&self, half: Half, i: usize, previous: Option<usize>) -> bool {
        let rect = &self.labels[i].rect;
        match half {
            Half::Upper => {
                let limit = previous.map_or(self.bounds.top, |p| self.labels[p].rect.bottom);
                rect.top < limit
            }
            Half::Lower => {
                let limit = previous.map_or(self.bounds.bottom, |p| self.labels[p].rect.top);
                rect.bottom > limit
            }
        }
    }

    fn finish(&mut self) -> DeclutterReport {
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        for (a, first) in self.labels.iter().enumerate() {
            for second in &self.labels[a + 1..] {
                if first.rect.overlaps(&second.rect) {
                    diagnostics.push(LayoutDiagnostic::OverlapResidual {
                        first: first.id,
                        second: second.id,
                    });
                }
            }
        }
        let residual = diagnostics
            .iter()
            .filter(|d| matches!(d, LayoutDiagnostic::OverlapResidual { .. }))
            .count();
        if residual > 0 {
            warn!(residual, "Probe labels still overlap after declutter");
        } else {
            debug!(
                labels = self.labels.len(),
                measurements = self.measurements,
                "Declutter finished"
            );
        }
        DeclutterReport {
            placements: self
                .labels
                .iter()
                .map(|l| LabelPlacement {
                    label: l.id,
                    offset_y: l.offset_y,
                    rect: l.rect,
                })
                .collect(),
            diagnostics,
            measurements: self.measurements,
        }
    }
}

/// Drive a [`Declutter`] to completion with a synchronous measurer.
pub fn run_declutter<M: LabelMeasurer + ?Sized>(
    labels: &[LabelId],
    bounds: VerticalBounds,
    config: DeclutterConfig,
    measurer: &mut M,
) -> DeclutterReport {
    let mut declutter = Declutter::new(labels, bounds, config);
    let mut step = declutter.start();
    loop {
        match step {
            DeclutterStep::Measure { label, offset_y } => {
                step = declutter.resume(measurer.measure(label, offset_y));
            }
            DeclutterStep::Finished(report) => return report,
        }
    }
}
