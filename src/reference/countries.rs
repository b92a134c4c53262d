//! Country Reference Module
//!
//! Lookups over `country_reference.json`, indexed by numeric country id.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::table::{load_json, LoadError, ReferenceTable};

pub const COUNTRY_REFERENCE_FILE: &str = "country_reference.json";

/// One row of the country reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub iso3_code: String,
    pub name: String,
    #[serde(default)]
    pub trade_region: Option<String>,
}

fn load_index(path: &Path) -> Result<HashMap<i64, Country>, LoadError> {
    let countries: Vec<Country> = load_json(path)?;
    Ok(countries.into_iter().map(|c| (c.id, c)).collect())
}

// == Country Reference ==
/// Country table keyed by id, loaded once.
#[derive(Debug)]
pub struct CountryReference {
    table: ReferenceTable<HashMap<i64, Country>>,
}

impl CountryReference {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            table: ReferenceTable::with_loader(data_dir.join(COUNTRY_REFERENCE_FILE), load_index),
        }
    }

    pub fn country(&self, id: i64) -> Option<&Country> {
        self.table.get()?.get(&id)
    }

    pub fn iso3(&self, id: i64) -> Option<&str> {
        self.country(id).map(|c| c.iso3_code.as_str())
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.country(id).map(|c| c.name.as_str())
    }

    pub fn trade_region(&self, id: i64) -> Option<&str> {
        self.country(id)?.trade_region.as_deref()
    }

    /// All countries sorted by name; empty when the file is unavailable.
    pub fn countries(&self) -> Vec<&Country> {
        let mut countries: Vec<&Country> = self
            .table
            .get()
            .map(|index| index.values().collect())
            .unwrap_or_default();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }
}
