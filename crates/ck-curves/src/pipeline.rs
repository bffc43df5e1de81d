//! Derived-series stages.
//!
//! Y: operation stage (restore or subtract an interpolated target), then
//! smoothing. X: scale by `10^exponent`, optionally mirrored. Only X is
//! reversed; Y keeps its sample order.

use crate::record::OperationKind;
use ck_kernel::{KernelError, KernelResult, SavGolCache, interpolate};

pub fn modified_xs(raw_xs: &[f64], exponent: i32, reverse: bool) -> Vec<f64> {
    let scale = 10f64.powi(exponent);
    let mut xs: Vec<f64> = raw_xs.iter().map(|x| x * scale).collect();
    if reverse {
        xs.reverse();
    }
    xs
}

/// `original` unchanged, or `original - target` with the target resampled
/// onto `own_xs`.
pub fn operation_stage(
    original: &[f64],
    own_xs: &[f64],
    operation: OperationKind,
    target: Option<(&[f64], &[f64])>,
) -> KernelResult<Vec<f64>> {
    let (OperationKind::Subtract, Some((target_xs, target_ys))) = (operation, target) else {
        return Ok(original.to_vec());
    };
    let resampled = interpolate(target_xs, target_ys, own_xs)?;
    if resampled.len() != original.len() {
        return Err(KernelError::LengthMismatch {
            what: "subtraction operands",
            left: original.len(),
            right: resampled.len(),
        });
    }
    Ok(original
        .iter()
        .zip(&resampled)
        .map(|(y, t)| y - t)
        .collect())
}

pub fn effective_ys(
    stage1: &[f64],
    smooth_level: u8,
    smoother: &mut SavGolCache,
) -> KernelResult<Vec<f64>> {
    smoother.smooth(stage1, smooth_level)
}
