//! Measurement Store

use crate::{list, tree, Measurement, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locations of the two persisted encodings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON list file (authoritative read source)
    pub list_path: PathBuf,
    /// XML tree file (mirror)
    pub tree_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            list_path: PathBuf::from("data.json"),
            tree_path: PathBuf::from("data.xml"),
        }
    }
}

impl StorageConfig {
    /// Default file names placed under `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            list_path: dir.join("data.json"),
            tree_path: dir.join("data.xml"),
        }
    }
}

/// Append-only measurement store backed by a JSON list and an XML tree.
///
/// Every call reads the current on-disk state; nothing is cached. Appends
/// rewrite both files whole, list first, with no rollback if the second
/// write fails.
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    config: StorageConfig,
}

impl MeasurementStore {
    /// Create a new measurement store
    pub fn new(config: StorageConfig) -> Self {
        info!(
            list = %config.list_path.display(),
            tree = %config.tree_path.display(),
            "Creating measurement store"
        );
        Self { config }
    }

    /// File locations this store reads and writes
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Create whichever encoding is missing, empty. Existing files are left alone.
    pub fn ensure_initialized(&self) -> Result<(), StorageError> {
        let list_path = &self.config.list_path;
        if !exists(list_path)? {
            write_file(list_path, list::encode(list_path, &[])?.as_bytes())?;
            info!(path = %list_path.display(), "Initialized empty list store");
        }

        let tree_path = &self.config.tree_path;
        if !exists(tree_path)? {
            write_file(tree_path, &tree::empty_document(tree_path)?)?;
            info!(path = %tree_path.display(), "Initialized empty tree store");
        }
        Ok(())
    }

    /// All measurements from the list encoding, in append order
    pub fn load_all(&self) -> Result<Vec<Measurement>, StorageError> {
        let path = &self.config.list_path;
        list::decode(path, &read_file(path)?)
    }

    /// All measurements from the tree encoding, in append order
    pub fn load_tree(&self) -> Result<Vec<Measurement>, StorageError> {
        let path = &self.config.tree_path;
        tree::decode(path, &read_file(path)?)
    }

    /// Number of records in the list encoding
    pub fn count(&self) -> Result<usize, StorageError> {
        self.load_all().map(|records| records.len())
    }

    /// Append one measurement to both encodings
    pub fn append(&self, measurement: Measurement) -> Result<(), StorageError> {
        let list_path = &self.config.list_path;
        let mut records = self.load_all()?;
        records.push(measurement);
        write_file(list_path, list::encode(list_path, &records)?.as_bytes())?;

        let tree_path = &self.config.tree_path;
        let document = tree::append(tree_path, &read_file(tree_path)?, &measurement)?;
        write_file(tree_path, &document)?;

        debug!(
            voltage = measurement.voltage,
            current = measurement.current,
            count = records.len(),
            "Appended measurement"
        );
        Ok(())
    }
}

fn exists(path: &Path) -> Result<bool, StorageError> {
    path.try_exists().map_err(|e| StorageError::io(path, e))
}

fn read_file(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(|e| StorageError::io(path, e))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| StorageError::io(path, e))
}
