//! Reading Validation
//!
//! Turns raw submitted text into numeric voltage/current readings.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{Reading, RawReading, Validator};
