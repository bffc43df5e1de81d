//! Curve set errors.

use crate::identity::CurveIdentity;
use ck_core::CurveHandle;
use ck_kernel::KernelError;
use thiserror::Error;

pub type CurvesResult<T> = Result<T, CurvesError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurvesError {
    /// Same content as a curve that is already loaded.
    #[error("Curve already loaded as {existing} (identity {identity})")]
    DuplicateCurve {
        identity: CurveIdentity,
        existing: CurveHandle,
    },

    #[error("X/Y length mismatch for {name:?}: {xs} vs {ys}")]
    LengthMismatch { name: String, xs: usize, ys: usize },

    /// The curve is another curve's subtraction target.
    #[error("Curve {curve} is a subtraction target and cannot hold an operation")]
    OperationLocked { curve: CurveHandle },

    #[error("Invalid operation target for curve {curve}: {reason}")]
    InvalidTarget {
        curve: CurveHandle,
        reason: &'static str,
    },

    #[error("Unknown curve {handle}")]
    UnknownCurve { handle: CurveHandle },

    #[error("Curve handle space exhausted")]
    HandlesExhausted,

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
