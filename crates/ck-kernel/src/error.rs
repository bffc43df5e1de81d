//! Error types for kernel operations.

use thiserror::Error;

/// Errors raised by the numeric kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Empty input: {what}")]
    Empty { what: &'static str },

    #[error("Length mismatch for {what}: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Singular matrix: pivot {pivot:e} in column {column}")]
    SingularMatrix { column: usize, pivot: f64 },

    #[error("Invalid smoothing window {window} for polynomial order {order}")]
    InvalidWindow { window: usize, order: usize },
}

pub type KernelResult<T> = Result<T, KernelError>;
