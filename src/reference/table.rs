//! Reference Table Module
//!
//! A static JSON file loaded on first access and kept for the process
//! lifetime. No TTL, no invalidation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

/// Why a reference file could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads and deserializes a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// == Reference Table ==
/// Lazily loaded, immutable JSON document.
///
/// The first call to [`ReferenceTable::get`] reads the file; every later
/// call returns the same data. A load failure is logged once and the table
/// stays absent for the rest of the process.
pub struct ReferenceTable<T> {
    path: PathBuf,
    loader: fn(&Path) -> Result<T, LoadError>,
    data: OnceLock<Option<T>>,
}

impl<T: DeserializeOwned> ReferenceTable<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, load_json::<T>)
    }
}

impl<T> ReferenceTable<T> {
    /// Creates a table that builds its data with `loader` instead of
    /// deserializing the file directly.
    pub fn with_loader(path: impl Into<PathBuf>, loader: fn(&Path) -> Result<T, LoadError>) -> Self {
        Self {
            path: path.into(),
            loader,
            data: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.data
            .get_or_init(|| match (self.loader)(&self.path) {
                Ok(data) => {
                    info!("Loaded reference data from {}", self.path.display());
                    Some(data)
                }
                Err(err) => {
                    warn!("Reference data unavailable: {}", err);
                    None
                }
            })
            .as_ref()
    }

    /// Whether a load has been attempted.
    pub fn is_initialized(&self) -> bool {
        self.data.get().is_some()
    }
}

impl<T> fmt::Debug for ReferenceTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceTable")
            .field("path", &self.path)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
