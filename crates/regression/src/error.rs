//! Regression Error Types

use thiserror::Error;

/// Errors during line fitting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// Every x value is the same, so no line through the data is defined
    #[error("Degenerate fit: all {n} x values are equal to {x}")]
    DegenerateFit { n: usize, x: f64 },

    /// Distinct x values, but the fit does not fit in an `f64`
    #[error("Numeric range exceeded fitting {n} points")]
    NumericRange { n: usize },

    /// x and y sequences differ in length
    #[error("Length mismatch: {x_len} x values, {y_len} y values")]
    LengthMismatch { x_len: usize, y_len: usize },
}
