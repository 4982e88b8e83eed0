//! Storage Layer
//!
//! Persists the append-only measurement sequence twice: a JSON list file
//! (the authoritative read source) and an XML tree file kept as a mirror.

mod list;
mod store;
mod tree;

pub use store::{MeasurementStore, StorageConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A single (voltage, current) reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub voltage: f64,
    pub current: f64,
}

impl Measurement {
    /// Create a new measurement
    pub fn new(voltage: f64, current: f64) -> Self {
        Self { voltage, current }
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// File could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Stored record is missing a field or holds a non-numeric value
    #[error("Corrupt data in {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
