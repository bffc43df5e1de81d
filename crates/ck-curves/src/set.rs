//! The curve set: insertion, removal, setters and recompute.

use crate::error::{CurvesError, CurvesResult};
use crate::graph::{self, GraphDiagnostic};
use crate::identity::{CurveIdentity, generate_identity};
use crate::naming::unique_name;
use crate::palette::ColorCursor;
use crate::pipeline;
use crate::record::{CurveRecord, MAX_SMOOTH_LEVEL, NewCurve, OperationKind};
use crate::style::{CurveStyle, Rgba};
use ck_core::{CurveHandle, IdAllocator};
use ck_kernel::{SavGolCache, SmoothingConfig};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// What a mutation made stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// Derived X series.
    pub xs: bool,
    /// Derived Y series.
    pub ys: bool,
    /// Operation rules must be re-enforced.
    pub graph: bool,
    /// Presentation only (name, visibility, style, axis).
    pub style: bool,
}

impl Invalidation {
    pub const NONE: Invalidation = Invalidation {
        xs: false,
        ys: false,
        graph: false,
        style: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    fn data() -> Self {
        Self {
            xs: true,
            ys: true,
            graph: true,
            style: false,
        }
    }

    fn ys_and_graph() -> Self {
        Self {
            ys: true,
            graph: true,
            ..Self::NONE
        }
    }
}

/// Outcome of [`CurveSet::recompute`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecomputeReport {
    pub diagnostics: Vec<GraphDiagnostic>,
    pub refreshed_xs: usize,
    pub refreshed_ys: usize,
}

/// Outcome of [`CurveSet::append_stream_sample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamAppend {
    pub handle: CurveHandle,
    pub created: bool,
}

/// Every loaded curve, in insertion order.
#[derive(Debug)]
pub struct CurveSet {
    records: Vec<CurveRecord>,
    handles: IdAllocator,
    colors: ColorCursor,
    smoother: SavGolCache,
    streams: HashMap<String, CurveHandle>,
    graph_dirty: bool,
}

impl Default for CurveSet {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}

impl CurveSet {
    pub fn new(smoothing: SmoothingConfig) -> Self {
        Self {
            records: Vec::new(),
            handles: IdAllocator::new(),
            colors: ColorCursor::default(),
            smoother: SavGolCache::new(smoothing),
            streams: HashMap::new(),
            graph_dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurveRecord> {
        self.records.iter()
    }

    pub fn get(&self, handle: CurveHandle) -> Option<&CurveRecord> {
        self.records.iter().find(|r| r.handle == handle)
    }

    pub fn find_by_identity(&self, identity: &CurveIdentity) -> Option<&CurveRecord> {
        self.records.iter().find(|r| &r.identity == identity)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CurveRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// True when any curve still needs a recompute.
    pub fn needs_recompute(&self) -> bool {
        self.graph_dirty || self.records.iter().any(CurveRecord::is_stale)
    }

    fn index_of(&self, handle: CurveHandle) -> CurvesResult<usize> {
        self.records
            .iter()
            .position(|r| r.handle == handle)
            .ok_or(CurvesError::UnknownCurve { handle })
    }

    fn duplicate_of(&self, identity: &CurveIdentity, skip: Option<usize>) -> Option<CurveHandle> {
        self.records
            .iter()
            .enumerate()
            .find(|(i, r)| Some(*i) != skip && !r.is_stream && &r.identity == identity)
            .map(|(_, r)| r.handle)
    }

    fn is_subtraction_target(&self, identity: &CurveIdentity) -> bool {
        self.records
            .iter()
            .any(|r| r.operation == OperationKind::Subtract && r.target.as_ref() == Some(identity))
    }

    /// Loader callback: one column of a parsed file becomes a curve. Only the
    /// first curve of a file starts visible.
    pub fn add_curve(
        &mut self,
        label: &str,
        xs: Vec<f64>,
        ys: Vec<f64>,
        source_path: Option<&Path>,
        is_first_in_file: bool,
    ) -> CurvesResult<CurveHandle> {
        self.insert(NewCurve {
            name: label.to_string(),
            xs,
            ys,
            source_path: source_path.map(Path::to_path_buf),
            visible: is_first_in_file,
            is_stream: false,
        })
    }

    pub fn insert(&mut self, curve: NewCurve) -> CurvesResult<CurveHandle> {
        if curve.xs.len() != curve.ys.len() {
            return Err(CurvesError::LengthMismatch {
                name: curve.name,
                xs: curve.xs.len(),
                ys: curve.ys.len(),
            });
        }

        let identity = generate_identity(&curve.ys, curve.is_stream);
        if let Some(existing) = self.duplicate_of(&identity, None) {
            info!(name = %curve.name, %existing, "Curve already loaded, skipping");
            return Err(CurvesError::DuplicateCurve { identity, existing });
        }

        let used: Vec<Rgba> = self.records.iter().map(|r| r.style.color).collect();
        let style = CurveStyle {
            color: self.colors.next(&used),
            ..CurveStyle::default()
        };

        let name = {
            let taken: HashSet<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
            let files: Vec<&str> = self
                .records
                .iter()
                .map(CurveRecord::source_file_name)
                .collect();
            let source_file = curve
                .source_path
                .as_deref()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str())
                .unwrap_or("");
            let base = if curve.name.is_empty() {
                "Unnamed"
            } else {
                curve.name.as_str()
            };
            unique_name(base, &taken, source_file, &files)
        };

        let handle = self.handles.allocate().ok_or(CurvesError::HandlesExhausted)?;
        let record = CurveRecord::new(handle, identity, name, curve, style);
        debug!(
            %handle,
            name = %record.name,
            points = record.len(),
            stream = record.is_stream,
            "Curve added"
        );
        self.records.push(record);
        self.link_compatible(self.records.len() - 1);
        self.graph_dirty = true;
        Ok(handle)
    }

    /// Add one live sample, creating the stream's curve on first use.
    pub fn append_stream_sample(&mut self, stream_id: &str, x: f64, y: f64) -> CurvesResult<StreamAppend> {
        let existing = self
            .streams
            .get(stream_id)
            .and_then(|h| self.records.iter().position(|r| r.handle == *h));

        let Some(idx) = existing else {
            let handle = self.insert(NewCurve::new(stream_id, vec![x], vec![y]).stream())?;
            self.streams.insert(stream_id.to_string(), handle);
            info!(stream = stream_id, %handle, "Stream curve created");
            return Ok(StreamAppend {
                handle,
                created: true,
            });
        };

        let rec = &mut self.records[idx];
        let mut xs = std::mem::take(&mut rec.raw_xs);
        let mut ys = std::mem::take(&mut rec.raw_ys);
        xs.push(x);
        ys.push(y);
        rec.replace_data(xs, ys);
        let (handle, identity) = (rec.handle, rec.identity.clone());

        self.relink_compatible(idx);
        self.mark_dependents_stale(&identity);
        self.graph_dirty = true;
        Ok(StreamAppend {
            handle,
            created: false,
        })
    }

    /// Remove a curve and scrub every reference to it.
    pub fn remove_curve(&mut self, handle: CurveHandle) -> CurvesResult<CurveRecord> {
        let idx = self.index_of(handle)?;
        let removed = self.records.remove(idx);
        for rec in &mut self.records {
            rec.other_curve_ids.remove(&removed.identity);
            if rec.target.as_ref() == Some(&removed.identity) {
                rec.clear_operation();
            }
        }
        self.streams.retain(|_, h| *h != handle);
        self.graph_dirty = true;
        debug!(%handle, name = %removed.name, "Curve removed");
        Ok(removed)
    }

    /// Replace a curve's raw samples.
    ///
    /// Loaded curves get a fresh content identity (rejected if it duplicates
    /// another curve) and every reference to the old identity follows it.
    pub fn update_curve_data(
        &mut self,
        handle: CurveHandle,
        xs: Vec<f64>,
        ys: Vec<f64>,
    ) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        if xs.len() != ys.len() {
            return Err(CurvesError::LengthMismatch {
                name: self.records[idx].name.clone(),
                xs: xs.len(),
                ys: ys.len(),
            });
        }

        let old = self.records[idx].identity.clone();
        let new = if self.records[idx].is_stream {
            old.clone()
        } else {
            generate_identity(&ys, false)
        };
        if let Some(existing) = self.duplicate_of(&new, Some(idx)) {
            return Err(CurvesError::DuplicateCurve {
                identity: new,
                existing,
            });
        }

        if new != old {
            for rec in &mut self.records {
                if rec.other_curve_ids.remove(&old) {
                    rec.other_curve_ids.insert(new.clone());
                }
                if rec.target.as_ref() == Some(&old) {
                    rec.target = Some(new.clone());
                }
            }
            self.records[idx].identity = new.clone();
        }

        self.records[idx].replace_data(xs, ys);
        self.relink_compatible(idx);
        self.mark_dependents_stale(&new);
        self.graph_dirty = true;
        Ok(Invalidation::data())
    }

    pub fn set_operation(&mut self, handle: CurveHandle, operation: OperationKind) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        if operation == OperationKind::Subtract && self.is_subtraction_target(&self.records[idx].identity) {
            return Err(CurvesError::OperationLocked { curve: handle });
        }
        let rec = &mut self.records[idx];
        if rec.operation == operation {
            return Ok(Invalidation::NONE);
        }
        rec.operation = operation;
        rec.effective_ys = None;
        self.graph_dirty = true;
        Ok(Invalidation::ys_and_graph())
    }

    pub fn set_target(
        &mut self,
        handle: CurveHandle,
        target: Option<CurveIdentity>,
    ) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        if let Some(t) = &target {
            if t == &self.records[idx].identity {
                return Err(CurvesError::InvalidTarget {
                    curve: handle,
                    reason: "a curve cannot target itself",
                });
            }
            if self.find_by_identity(t).is_none() {
                return Err(CurvesError::InvalidTarget {
                    curve: handle,
                    reason: "no curve has that identity",
                });
            }
            if self.is_subtraction_target(&self.records[idx].identity) {
                return Err(CurvesError::OperationLocked { curve: handle });
            }
        }
        let rec = &mut self.records[idx];
        if rec.target == target {
            return Ok(Invalidation::NONE);
        }
        rec.target = target;
        rec.effective_ys = None;
        self.graph_dirty = true;
        Ok(Invalidation::ys_and_graph())
    }

    /// Levels above 4 are clamped.
    pub fn set_smooth_level(&mut self, handle: CurveHandle, level: u8) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        let rec = &mut self.records[idx];
        let level = level.min(MAX_SMOOTH_LEVEL);
        if rec.smooth_level == level {
            return Ok(Invalidation::NONE);
        }
        rec.smooth_level = level;
        rec.effective_ys = None;
        Ok(Invalidation {
            ys: true,
            ..Invalidation::NONE
        })
    }

    pub fn set_x_magnitude_exponent(&mut self, handle: CurveHandle, exponent: i32) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        let rec = &mut self.records[idx];
        if rec.x_magnitude_exponent == exponent {
            return Ok(Invalidation::NONE);
        }
        rec.x_magnitude_exponent = exponent;
        rec.modified_xs = None;
        Ok(Invalidation {
            xs: true,
            ..Invalidation::NONE
        })
    }

    pub fn set_reverse_x(&mut self, handle: CurveHandle, reverse: bool) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        let rec = &mut self.records[idx];
        if rec.reverse_x == reverse {
            return Ok(Invalidation::NONE);
        }
        rec.reverse_x = reverse;
        rec.modified_xs = None;
        Ok(Invalidation {
            xs: true,
            ..Invalidation::NONE
        })
    }

    pub fn set_visible(&mut self, handle: CurveHandle, visible: bool) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        Ok(style_change(&mut self.records[idx].visible, visible))
    }

    pub fn set_secondary_axis(&mut self, handle: CurveHandle, secondary: bool) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        Ok(style_change(&mut self.records[idx].secondary_axis, secondary))
    }

    pub fn set_name(&mut self, handle: CurveHandle, name: &str) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        Ok(style_change(&mut self.records[idx].name, name.to_string()))
    }

    /// Out-of-range fields are clamped, see [`CurveStyle::normalized`].
    pub fn set_style(&mut self, handle: CurveHandle, style: CurveStyle) -> CurvesResult<Invalidation> {
        let idx = self.index_of(handle)?;
        Ok(style_change(&mut self.records[idx].style, style.normalized()))
    }

    /// Enforce the operation rules and refresh every stale cache.
    ///
    /// Only a singular smoothing solve is returned as an error; everything
    /// else is cleared and reported in the [`RecomputeReport`].
    pub fn recompute(&mut self) -> CurvesResult<RecomputeReport> {
        let mut report = RecomputeReport::default();

        if self.graph_dirty {
            report
                .diagnostics
                .extend(graph::enforce_operation_rules(&mut self.records));
            self.graph_dirty = false;
        }

        for rec in &mut self.records {
            if rec.modified_xs.is_none() {
                rec.modified_xs = Some(pipeline::modified_xs(
                    &rec.raw_xs,
                    rec.x_magnitude_exponent,
                    rec.reverse_x,
                ));
                report.refreshed_xs += 1;
            }
        }

        let stale: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.effective_ys.is_none())
            .map(|(i, _)| i)
            .collect();
        for &i in &stale {
            self.records[i].snapshot_original();
        }

        let mut updates = Vec::with_capacity(stale.len());
        let mut failed = Vec::new();
        for &i in &stale {
            let rec = &self.records[i];
            let target = match (rec.operation, &rec.target) {
                (OperationKind::Subtract, Some(id)) => self
                    .records
                    .iter()
                    .find(|r| &r.identity == id)
                    .map(|t| (t.raw_xs.as_slice(), t.raw_ys.as_slice())),
                _ => None,
            };
            let stage1 =
                match pipeline::operation_stage(rec.original_ys(), &rec.raw_xs, rec.operation, target) {
                    Ok(v) => v,
                    Err(reason) => {
                        warn!(curve = %rec.handle, name = %rec.name, %reason, "Operation failed, restoring");
                        report.diagnostics.push(GraphDiagnostic::OperationFailed {
                            curve: rec.handle,
                            reason,
                        });
                        failed.push(i);
                        rec.original_ys().to_vec()
                    }
                };
            let ys = pipeline::effective_ys(&stage1, rec.smooth_level, &mut self.smoother)?;
            updates.push((i, ys));
        }

        report.refreshed_ys = updates.len();
        for (i, ys) in updates {
            self.records[i].effective_ys = Some(ys);
        }
        if !failed.is_empty() {
            for &i in &failed {
                let rec = &mut self.records[i];
                rec.operation = OperationKind::None;
                rec.target = None;
            }
            // Clearing only removes targets, so this pass only re-enables.
            report
                .diagnostics
                .extend(graph::enforce_operation_rules(&mut self.records));
        }

        Ok(report)
    }

    /// Derived `(xs, ys)` for one curve, recomputing first if anything is stale.
    pub fn series(&mut self, handle: CurveHandle) -> CurvesResult<(&[f64], &[f64])> {
        if self.needs_recompute() {
            self.recompute()?;
        }
        let idx = self.index_of(handle)?;
        let rec = &self.records[idx];
        Ok((
            rec.modified_xs.as_deref().unwrap_or_default(),
            rec.effective_ys.as_deref().unwrap_or_default(),
        ))
    }

    /// Link the curve at `idx` with every other curve of the same length.
    fn link_compatible(&mut self, idx: usize) {
        let identity = self.records[idx].identity.clone();
        let len = self.records[idx].len();
        let mut peers = Vec::new();
        for (i, rec) in self.records.iter_mut().enumerate() {
            if i != idx && rec.len() == len && rec.identity != identity {
                rec.other_curve_ids.insert(identity.clone());
                peers.push(rec.identity.clone());
            }
        }
        self.records[idx].other_curve_ids.extend(peers);
    }

    fn relink_compatible(&mut self, idx: usize) {
        let identity = self.records[idx].identity.clone();
        for rec in &mut self.records {
            rec.other_curve_ids.remove(&identity);
        }
        self.records[idx].other_curve_ids.clear();
        self.link_compatible(idx);
    }

    fn mark_dependents_stale(&mut self, identity: &CurveIdentity) {
        for rec in &mut self.records {
            if rec.target.as_ref() == Some(identity) {
                rec.effective_ys = None;
            }
        }
    }
}

fn style_change<T: PartialEq>(slot: &mut T, value: T) -> Invalidation {
    if *slot == value {
        return Invalidation::NONE;
    }
    *slot = value;
    Invalidation {
        style: true,
        ..Invalidation::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;

    fn grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut set = CurveSet::default();
        let first = set.add_curve("a", grid(3), vec![1.0, 2.0, 3.0], None, true).unwrap();
        let err = set
            .add_curve("b", grid(3), vec![1.0, 2.0, 3.0], None, true)
            .unwrap_err();
        assert!(matches!(err, CurvesError::DuplicateCurve { existing, .. } if existing == first));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut set = CurveSet::default();
        let err = set.add_curve("a", grid(3), vec![1.0], None, true).unwrap_err();
        assert!(matches!(err, CurvesError::LengthMismatch { xs: 3, ys: 1, .. }));
    }

    #[test]
    fn only_first_curve_of_file_is_visible() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(2), vec![1.0, 2.0], None, true).unwrap();
        let b = set.add_curve("b", grid(2), vec![3.0, 4.0], None, false).unwrap();
        assert!(set.get(a).unwrap().visible());
        assert!(!set.get(b).unwrap().visible());
    }

    #[test]
    fn colors_and_names_are_assigned() {
        let mut set = CurveSet::default();
        let a = set
            .add_curve("Y", grid(2), vec![1.0, 2.0], Some(Path::new("/d/run_cold.csv")), true)
            .unwrap();
        let b = set
            .add_curve("Y", grid(2), vec![5.0, 6.0], Some(Path::new("/d/run_hot.csv")), true)
            .unwrap();
        assert_eq!(set.get(a).unwrap().style().color, PALETTE[0]);
        assert_eq!(set.get(b).unwrap().style().color, PALETTE[1]);
        assert_eq!(set.get(a).unwrap().name(), "Y");
        assert_eq!(set.get(b).unwrap().name(), "Y-hot");
    }

    #[test]
    fn other_curve_ids_track_lengths() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(3), vec![1.0, 2.0, 3.0], None, true).unwrap();
        let b = set.add_curve("b", grid(3), vec![4.0, 5.0, 6.0], None, true).unwrap();
        let c = set.add_curve("c", grid(2), vec![7.0, 8.0], None, true).unwrap();

        let id_a = set.get(a).unwrap().identity().clone();
        let id_b = set.get(b).unwrap().identity().clone();
        assert!(set.get(a).unwrap().other_curve_ids().contains(&id_b));
        assert!(set.get(b).unwrap().other_curve_ids().contains(&id_a));
        assert!(set.get(c).unwrap().other_curve_ids().is_empty());

        // c grows to length 3 and becomes compatible.
        set.update_curve_data(c, grid(3), vec![7.0, 8.0, 9.0]).unwrap();
        let id_c = set.get(c).unwrap().identity().clone();
        assert_eq!(set.get(c).unwrap().other_curve_ids().len(), 2);
        assert!(set.get(a).unwrap().other_curve_ids().contains(&id_c));
    }

    #[test]
    fn subtract_and_restore() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(3), vec![10.0, 10.0, 10.0], None, true).unwrap();
        let b = set.add_curve("b", grid(3), vec![1.0, 2.0, 3.0], None, true).unwrap();
        let id_b = set.get(b).unwrap().identity().clone();

        set.set_operation(a, OperationKind::Subtract).unwrap();
        set.set_target(a, Some(id_b)).unwrap();
        let report = set.recompute().unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(set.get(a).unwrap().effective_ys().unwrap(), &[9.0, 8.0, 7.0]);
        assert!(!set.get(b).unwrap().operation_enabled());

        set.set_operation(a, OperationKind::None).unwrap();
        set.recompute().unwrap();
        assert_eq!(set.get(a).unwrap().effective_ys().unwrap(), &[10.0, 10.0, 10.0]);
        assert!(set.get(b).unwrap().operation_enabled());
    }

    #[test]
    fn locked_target_rejects_operation() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(2), vec![1.0, 2.0], None, true).unwrap();
        let b = set.add_curve("b", grid(2), vec![3.0, 4.0], None, true).unwrap();
        let id_a = set.get(a).unwrap().identity().clone();
        let id_b = set.get(b).unwrap().identity().clone();

        set.set_operation(a, OperationKind::Subtract).unwrap();
        set.set_target(a, Some(id_b)).unwrap();

        assert_eq!(
            set.set_operation(b, OperationKind::Subtract),
            Err(CurvesError::OperationLocked { curve: b })
        );
        assert_eq!(
            set.set_target(b, Some(id_a.clone())),
            Err(CurvesError::OperationLocked { curve: b })
        );
        assert!(matches!(
            set.set_target(a, Some(id_a)),
            Err(CurvesError::InvalidTarget { .. })
        ));
        assert!(matches!(
            set.set_target(a, Some(CurveIdentity::new("nope"))),
            Err(CurvesError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn removal_scrubs_references() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(2), vec![1.0, 2.0], None, true).unwrap();
        let b = set.add_curve("b", grid(2), vec![3.0, 4.0], None, true).unwrap();
        let id_b = set.get(b).unwrap().identity().clone();
        set.set_operation(a, OperationKind::Subtract).unwrap();
        set.set_target(a, Some(id_b.clone())).unwrap();
        set.recompute().unwrap();

        let removed = set.remove_curve(b).unwrap();
        assert_eq!(removed.identity(), &id_b);
        let rec_a = set.get(a).unwrap();
        assert_eq!(rec_a.operation(), OperationKind::None);
        assert!(rec_a.target().is_none());
        assert!(rec_a.other_curve_ids().is_empty());

        set.recompute().unwrap();
        assert_eq!(set.get(a).unwrap().effective_ys().unwrap(), &[1.0, 2.0]);
        assert!(matches!(
            set.remove_curve(b),
            Err(CurvesError::UnknownCurve { .. })
        ));
    }

    #[test]
    fn update_rewrites_target_identity() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(2), vec![5.0, 5.0], None, true).unwrap();
        let b = set.add_curve("b", grid(2), vec![1.0, 1.0], None, true).unwrap();
        let id_b = set.get(b).unwrap().identity().clone();
        set.set_operation(a, OperationKind::Subtract).unwrap();
        set.set_target(a, Some(id_b.clone())).unwrap();
        set.recompute().unwrap();

        let inv = set.update_curve_data(b, grid(2), vec![2.0, 2.0]).unwrap();
        assert!(inv.ys && inv.graph);
        let new_id = set.get(b).unwrap().identity().clone();
        assert_ne!(new_id, id_b);
        assert_eq!(set.get(a).unwrap().target(), Some(&new_id));

        set.recompute().unwrap();
        assert_eq!(set.get(a).unwrap().effective_ys().unwrap(), &[3.0, 3.0]);
    }

    #[test]
    fn update_to_duplicate_content_is_rejected() {
        let mut set = CurveSet::default();
        set.add_curve("a", grid(2), vec![1.0, 2.0], None, true).unwrap();
        let b = set.add_curve("b", grid(2), vec![3.0, 4.0], None, true).unwrap();
        assert!(matches!(
            set.update_curve_data(b, grid(2), vec![1.0, 2.0]),
            Err(CurvesError::DuplicateCurve { .. })
        ));
    }

    #[test]
    fn mismatch_after_update_clears_operation() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(2), vec![5.0, 5.0], None, true).unwrap();
        let b = set.add_curve("b", grid(2), vec![1.0, 1.0], None, true).unwrap();
        let id_b = set.get(b).unwrap().identity().clone();
        set.set_operation(a, OperationKind::Subtract).unwrap();
        set.set_target(a, Some(id_b)).unwrap();
        set.recompute().unwrap();

        set.update_curve_data(b, grid(3), vec![1.0, 1.0, 1.0]).unwrap();
        let report = set.recompute().unwrap();
        assert!(matches!(
            report.diagnostics[0],
            GraphDiagnostic::OperationMismatch { .. }
        ));
        assert_eq!(set.get(a).unwrap().operation(), OperationKind::None);
        assert_eq!(set.get(a).unwrap().effective_ys().unwrap(), &[5.0, 5.0]);
    }

    #[test]
    fn stream_samples_append() {
        let mut set = CurveSet::default();
        let first = set.append_stream_sample("temp", 0.0, 1.0).unwrap();
        assert!(first.created);
        let second = set.append_stream_sample("temp", 1.0, 2.0).unwrap();
        assert!(!second.created);
        assert_eq!(first.handle, second.handle);

        let rec = set.get(first.handle).unwrap();
        assert!(rec.is_stream());
        assert!(rec.visible());
        assert_eq!(rec.name(), "temp");
        assert_eq!(rec.raw_ys(), &[1.0, 2.0]);

        // Streams never collide with loaded content.
        set.add_curve("c", grid(2), vec![1.0, 2.0], None, true).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn setters_report_invalidation() {
        let mut set = CurveSet::default();
        let a = set.add_curve("a", grid(6), vec![1.0; 6], None, true).unwrap();
        set.recompute().unwrap();

        let inv = set.set_smooth_level(a, 9).unwrap();
        assert!(inv.ys && !inv.xs);
        assert_eq!(set.get(a).unwrap().smooth_level(), 4);
        assert!(set.set_smooth_level(a, 4).unwrap().is_empty());

        assert!(set.set_reverse_x(a, true).unwrap().xs);
        assert!(set.set_x_magnitude_exponent(a, -3).unwrap().xs);
        assert!(set.set_visible(a, false).unwrap().style);
        assert!(set.set_secondary_axis(a, true).unwrap().style);

        let (xs, ys) = set.series(a).unwrap();
        assert!((xs[0] - 0.005).abs() < 1e-15);
        assert!(ys.iter().all(|y| (y - 1.0).abs() < 1e-12));
    }
}
