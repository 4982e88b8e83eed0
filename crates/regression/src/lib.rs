//! Regression Engine
//!
//! Least-squares line fitting of current against voltage, with the
//! standard errors of slope and intercept when the residual has degrees
//! of freedom left.

mod error;
mod linear;

pub use error::RegressionError;
pub use linear::{fit, RegressionResult};
