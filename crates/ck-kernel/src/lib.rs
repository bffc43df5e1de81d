//! ck-kernel: numeric kernel for curve analytics.
//!
//! Provides:
//! - Clamped linear interpolation onto a new X grid
//! - Gaussian elimination with partial pivoting
//! - Savitzky-Golay smoothing (coefficients, window selection, filtering)
//!
//! # Example
//!
//! ```
//! use ck_kernel::interpolate;
//!
//! let y = interpolate(&[0.0, 10.0], &[0.0, 100.0], &[-1.0, 2.5, 11.0]).unwrap();
//! assert_eq!(y, vec![0.0, 25.0, 100.0]);
//! ```

pub mod error;
pub mod interp;
pub mod linear;
pub mod savgol;

pub use error::{KernelError, KernelResult};
pub use interp::interpolate;
pub use linear::solve_linear;
pub use savgol::{
    SavGolCache, SmoothingConfig, savgol_coefficients, savgol_filter, smoothing_window,
};
