//! Savitzky-Golay smoothing.
//!
//! The convolution kernel for a `(window, order)` pair is the centre row of
//! the least-squares hat matrix: solve `(AᵗA) c = Aᵗ e₀` with
//! `A[i, j] = offset_iʲ` over offsets `-half..=half` and `e₀` the unit impulse
//! at the centre tap, then `kernel = A c`.
//!
//! Offsets are scaled by `1 / half` before building `A`. The hat matrix is
//! invariant under column scaling, so the kernel is the same as for raw
//! integer offsets while the normal equations stay well-conditioned for wide
//! windows.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{KernelError, KernelResult};
use crate::linear::solve_linear;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Window-selection policy for the discrete smooth levels.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingConfig {
    /// Window size as a fraction of series length, for levels 1..=4.
    pub level_fractions: [f64; 4],
    /// Smallest window ever used.
    pub min_window: usize,
    /// Upper bound on the fitted polynomial order.
    pub max_order: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            level_fractions: [0.01, 0.03, 0.05, 0.10],
            min_window: 5,
            max_order: 3,
        }
    }
}

impl SmoothingConfig {
    /// Highest supported smooth level.
    pub const MAX_LEVEL: u8 = 4;

    /// Polynomial order used for a given window.
    pub fn order_for(&self, window: usize) -> usize {
        self.max_order.min(window.saturating_sub(2))
    }
}

/// Odd window size for smoothing a series of `len` samples at `level`.
///
/// Returns `None` for level 0 or when the series is shorter than the minimum
/// window (no smoothing is applied then).
pub fn smoothing_window(len: usize, level: u8, config: &SmoothingConfig) -> Option<usize> {
    if level == 0 || len < config.min_window {
        return None;
    }
    let idx = usize::from(level.min(SmoothingConfig::MAX_LEVEL)) - 1;
    let fraction = config.level_fractions[idx];

    let mut window = (len as f64 * fraction).round() as usize;
    if window % 2 == 0 {
        window += 1;
    }
    window = window.max(config.min_window);
    if window > len {
        window = if len % 2 == 0 { len - 1 } else { len };
    }
    Some(window)
}

/// Convolution kernel of length `window` for a polynomial fit of `order`.
pub fn savgol_coefficients(window: usize, order: usize) -> KernelResult<Vec<f64>> {
    if window < 3 || window % 2 == 0 || order >= window {
        return Err(KernelError::InvalidWindow { window, order });
    }
    let half = (window / 2) as i64;
    let terms = order + 1;
    let scale = 1.0 / half as f64;

    let a = DMatrix::from_fn(window, terms, |row, col| {
        let offset = (row as i64 - half) as f64 * scale;
        offset.powi(col as i32)
    });
    let at = a.transpose();
    let ata = &at * &a;

    let mut e0 = DVector::<f64>::zeros(window);
    e0[half as usize] = 1.0;
    let rhs = &at * &e0;

    let c = solve_linear(&ata, &rhs)?;
    let kernel = &a * &c;
    Ok(kernel.iter().copied().collect())
}

/// Convolve `y` with `kernel`, replicating the edge samples outside the series.
pub fn apply_kernel(y: &[f64], kernel: &[f64]) -> Vec<f64> {
    if y.is_empty() {
        return Vec::new();
    }
    let half = (kernel.len() / 2) as isize;
    let last = (y.len() - 1) as isize;

    (0..y.len() as isize)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| {
                    let idx = (i + k as isize - half).clamp(0, last);
                    w * y[idx as usize]
                })
                .sum()
        })
        .collect()
}

/// One-shot Savitzky-Golay filter.
pub fn savgol_filter(y: &[f64], window: usize, order: usize) -> KernelResult<Vec<f64>> {
    let kernel = savgol_coefficients(window, order)?;
    Ok(apply_kernel(y, &kernel))
}

/// Memoized kernels keyed by `(window, order)`.
#[derive(Debug, Default, Clone)]
pub struct SavGolCache {
    config: SmoothingConfig,
    kernels: HashMap<(usize, usize), Arc<[f64]>>,
}

impl SavGolCache {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            kernels: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Kernel for the pair, computing it on first use.
    pub fn kernel(&mut self, window: usize, order: usize) -> KernelResult<Arc<[f64]>> {
        if let Some(k) = self.kernels.get(&(window, order)) {
            return Ok(Arc::clone(k));
        }
        let kernel: Arc<[f64]> = savgol_coefficients(window, order)?.into();
        debug!(window, order, "computed Savitzky-Golay kernel");
        self.kernels.insert((window, order), Arc::clone(&kernel));
        Ok(kernel)
    }

    /// Smooth `y` at the given level. Level 0 and short series come back unchanged.
    pub fn smooth(&mut self, y: &[f64], level: u8) -> KernelResult<Vec<f64>> {
        let Some(window) = smoothing_window(y.len(), level, &self.config) else {
            return Ok(y.to_vec());
        };
        let order = self.config.order_for(window);
        let kernel = self.kernel(window, order)?;
        Ok(apply_kernel(y, &kernel))
    }

    /// Number of distinct kernels computed so far.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
