//! Reference Data Module
//!
//! Static JSON lookup tables (tariff summaries, commentary, countries),
//! each loaded once on first access and kept read-only for the process
//! lifetime. Unlike [`TtlCache`](crate::cache::TtlCache) nothing here expires.

mod countries;
mod table;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

pub use countries::{Country, CountryReference, COUNTRY_REFERENCE_FILE};
pub use table::{load_json, LoadError, ReferenceTable};

/// Reference documents served as-is.
pub const REFERENCE_FILES: [&str; 6] = [
    "us_tariff_commentary.json",
    "us_tariff_full_summary.json",
    "us_tariff_summary.json",
    "us_tariff_on_world.json",
    "world_tariff_on_us.json",
    COUNTRY_REFERENCE_FILE,
];

// == Reference Data ==
/// The set of known reference documents under one data directory.
#[derive(Debug)]
pub struct ReferenceData {
    data_dir: PathBuf,
    documents: HashMap<&'static str, ReferenceTable<Value>>,
    countries: CountryReference,
}

impl ReferenceData {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let documents = REFERENCE_FILES
            .iter()
            .map(|name| (*name, ReferenceTable::new(data_dir.join(name))))
            .collect();

        Self {
            countries: CountryReference::new(&data_dir),
            documents,
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the named document, `None` for unknown names or files that
    /// failed to load.
    pub fn document(&self, name: &str) -> Option<&Value> {
        self.documents.get(name)?.get()
    }

    pub fn countries(&self) -> &CountryReference {
        &self.countries
    }
}
