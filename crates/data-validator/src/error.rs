//! Validation Error Types

use thiserror::Error;

/// Errors while parsing a submitted reading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Field not present in the submission
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Text does not parse as a number
    #[error("{field} value '{value}' is not a number")]
    InvalidFormat { field: &'static str, value: String },

    /// Parses, but as infinity or NaN, which the list file cannot hold
    #[error("{field} value '{value}' is not finite")]
    NonFinite { field: &'static str, value: String },
}
