//! Reading Validator

use crate::error::ValidationError;
use serde::Deserialize;
use tracing::debug;

/// Reading as submitted, before parsing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    pub voltage: Option<String>,
    pub current: Option<String>,
}

impl RawReading {
    pub fn new(voltage: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            voltage: Some(voltage.into()),
            current: Some(current.into()),
        }
    }
}

/// Parsed reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub voltage: f64,
    pub current: f64,
}

/// Parser for submitted readings.
///
/// Accepts anything `f64::from_str` does after trimming surrounding
/// whitespace, except infinities and NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single field
    pub fn parse_field(
        &self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Result<f64, ValidationError> {
        let raw = raw.ok_or(ValidationError::MissingField(field))?;
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidFormat {
                field,
                value: raw.to_string(),
            })?;

        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                field,
                value: raw.to_string(),
            });
        }
        Ok(value)
    }

    /// Parse both fields of a submission
    pub fn validate(&self, raw: &RawReading) -> Result<Reading, ValidationError> {
        let voltage = self.parse_field("voltage", raw.voltage.as_deref())?;
        let current = self.parse_field("current", raw.current.as_deref())?;
        debug!(voltage, current, "Validated reading");
        Ok(Reading { voltage, current })
    }
}
