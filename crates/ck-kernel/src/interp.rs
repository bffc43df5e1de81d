//! Clamped linear interpolation.

use crate::error::{KernelError, KernelResult};

/// Map `y_src` (sampled at `x_src`) onto the `x_dst` grid.
///
/// Values left of `x_src[0]` take `y_src[0]`, values right of the last
/// sample take the last `y_src`. `x_src` must be sorted ascending; this is
/// not checked.
pub fn interpolate(x_src: &[f64], y_src: &[f64], x_dst: &[f64]) -> KernelResult<Vec<f64>> {
    if x_src.is_empty() {
        return Err(KernelError::Empty {
            what: "interpolation source",
        });
    }
    if x_src.len() != y_src.len() {
        return Err(KernelError::LengthMismatch {
            what: "interpolation source",
            left: x_src.len(),
            right: y_src.len(),
        });
    }

    let n = x_src.len();
    let first = x_src[0];
    let last = x_src[n - 1];

    let y_dst = x_dst
        .iter()
        .map(|&x| {
            if x <= first {
                y_src[0]
            } else if x >= last {
                y_src[n - 1]
            } else {
                // Last sample with x_src[j] <= x; strictly inside, so j + 1 < n.
                let j = x_src.partition_point(|&v| v <= x) - 1;
                let (x0, x1) = (x_src[j], x_src[j + 1]);
                let (y0, y1) = (y_src[j], y_src[j + 1]);
                y0 + (y1 - y0) * (x - x0) / (x1 - x0)
            }
        })
        .collect();

    Ok(y_dst)
}
