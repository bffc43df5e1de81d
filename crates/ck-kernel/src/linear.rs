//! Dense linear solve by Gaussian elimination with partial pivoting.

use crate::error::{KernelError, KernelResult};
use nalgebra::{DMatrix, DVector};

/// Pivots smaller than this fraction of the largest matrix entry are treated as zero.
const RELATIVE_PIVOT_EPS: f64 = 1e-12;

/// Solve `a * x = b` for square `a`.
///
/// Works on an augmented copy `[a | b]`: forward elimination with row swaps
/// on the largest remaining pivot, then back substitution.
pub fn solve_linear(a: &DMatrix<f64>, b: &DVector<f64>) -> KernelResult<DVector<f64>> {
    let n = b.len();
    if n == 0 {
        return Err(KernelError::Empty {
            what: "linear system",
        });
    }
    if a.nrows() != n || a.ncols() != n {
        return Err(KernelError::LengthMismatch {
            what: "linear system",
            left: a.nrows() * a.ncols(),
            right: n * n,
        });
    }

    let mut m = DMatrix::<f64>::zeros(n, n + 1);
    m.view_mut((0, 0), (n, n)).copy_from(a);
    m.set_column(n, b);

    let scale = a.amax();
    let tiny = if scale > 0.0 {
        scale * RELATIVE_PIVOT_EPS
    } else {
        f64::MIN_POSITIVE
    };

    for col in 0..n {
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if m[(row, col)].abs() > m[(pivot_row, col)].abs() {
                pivot_row = row;
            }
        }
        let pivot = m[(pivot_row, col)];
        if !pivot.is_finite() || pivot.abs() < tiny {
            return Err(KernelError::SingularMatrix { column: col, pivot });
        }
        if pivot_row != col {
            m.swap_rows(pivot_row, col);
        }

        for row in (col + 1)..n {
            let factor = m[(row, col)] / m[(col, col)];
            if factor == 0.0 {
                continue;
            }
            for k in col..=n {
                let delta = factor * m[(col, k)];
                m[(row, k)] -= delta;
            }
        }
    }

    let mut x = DVector::<f64>::zeros(n);
    for i in (0..n).rev() {
        x[i] = m[(i, n)] / m[(i, i)];
        for k in 0..i {
            let delta = m[(k, i)] * x[i];
            m[(k, n)] -= delta;
        }
    }

    Ok(x)
}
