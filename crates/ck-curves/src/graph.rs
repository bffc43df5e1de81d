//! Operation-graph rules across the whole curve set.
//!
//! A curve may subtract one other curve. A curve that is currently someone's
//! subtraction target cannot hold an operation itself, which keeps every
//! dependency chain at depth one.

use crate::identity::CurveIdentity;
use crate::record::{CurveRecord, OperationKind};
use ck_core::CurveHandle;
use ck_kernel::KernelError;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Non-fatal findings of a recompute pass. The offending operation has
/// already been cleared when one of these is reported.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphDiagnostic {
    /// Target sample count differs from the curve's.
    OperationMismatch {
        curve: CurveHandle,
        target: CurveIdentity,
        curve_len: usize,
        target_len: usize,
    },
    /// Target identity no longer resolves.
    MissingTarget {
        curve: CurveHandle,
        target: CurveIdentity,
    },
    /// The curve became a subtraction target and lost its own operation.
    TargetLocked { curve: CurveHandle },
    /// The operation stage itself failed.
    OperationFailed {
        curve: CurveHandle,
        reason: KernelError,
    },
}

impl GraphDiagnostic {
    pub fn curve(&self) -> CurveHandle {
        match self {
            GraphDiagnostic::OperationMismatch { curve, .. }
            | GraphDiagnostic::MissingTarget { curve, .. }
            | GraphDiagnostic::TargetLocked { curve }
            | GraphDiagnostic::OperationFailed { curve, .. } => *curve,
        }
    }
}

/// Identities currently targeted by a subtracting curve.
pub fn subtraction_targets(records: &[CurveRecord]) -> HashSet<CurveIdentity> {
    records
        .iter()
        .filter(|r| r.operation == OperationKind::Subtract)
        .filter_map(|r| r.target.clone())
        .collect()
}

/// Clear invalid targets, then lock every subtraction target, repeating
/// until nothing changes. Enabled flags reflect the final state.
pub(crate) fn enforce_operation_rules(records: &mut [CurveRecord]) -> Vec<GraphDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut changed = false;

        let lengths: HashMap<CurveIdentity, usize> = records
            .iter()
            .map(|r| (r.identity.clone(), r.len()))
            .collect();

        for rec in records.iter_mut() {
            let Some(target) = rec.target.clone() else {
                continue;
            };
            let diagnostic = match lengths.get(&target) {
                None => GraphDiagnostic::MissingTarget {
                    curve: rec.handle,
                    target,
                },
                Some(&target_len) if target_len != rec.len() => {
                    GraphDiagnostic::OperationMismatch {
                        curve: rec.handle,
                        target,
                        curve_len: rec.len(),
                        target_len,
                    }
                }
                Some(_) => continue,
            };
            warn!(curve = %rec.handle, name = %rec.name, ?diagnostic, "Clearing operation");
            rec.clear_operation();
            diagnostics.push(diagnostic);
            changed = true;
        }

        let targets = subtraction_targets(records);
        for rec in records.iter_mut() {
            if targets.contains(&rec.identity) {
                if rec.operation != OperationKind::None || rec.target.is_some() {
                    debug!(curve = %rec.handle, name = %rec.name, "Subtraction target loses its operation");
                    rec.clear_operation();
                    diagnostics.push(GraphDiagnostic::TargetLocked { curve: rec.handle });
                    changed = true;
                }
                rec.operation_enabled = false;
                rec.target_enabled = false;
            } else {
                rec.operation_enabled = true;
                rec.target_enabled = true;
            }
        }

        if !changed {
            break;
        }
    }

    debug!(passes, diagnostics = diagnostics.len(), "Operation rules enforced");
    diagnostics
}
