//! Drug Library
//!
//! A read-only table of validated [`DrugProfile`]s keyed by drug name. The library is built once
//! and handed to the engine; it is never a global.
//!
//! # Format
//!
//! ```json
//! {
//!   "Vancomycin": {
//!     "population_clearance": 4.5,
//!     "population_vd_per_kg": 0.7,
//!     "therapeutic_range": { "lower": 15.0, "upper": 25.0 }
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use renaldose::DrugLibrary;
//!
//! let library = DrugLibrary::builtin()?;
//! for name in library.names() {
//!     println!("Available: {}", name);
//! }
//! let vanco = library.get("Vancomycin")?;
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{DrugProfile, LibraryError, TherapeuticRange};

// Embed the built-in table at compile time
const BUILTIN: &str = include_str!("builtin.json");

/// On-disk shape of a single entry, before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DrugEntry {
    population_clearance: f64,
    population_vd_per_kg: f64,
    therapeutic_range: TherapeuticRange,
}

/// A registry of drug profiles
#[derive(Debug, Clone, Default)]
pub struct DrugLibrary {
    drugs: BTreeMap<String, DrugProfile>,
}

impl DrugLibrary {
    /// Create a new empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library with the built-in drugs
    pub fn builtin() -> Result<Self, LibraryError> {
        Self::from_json(BUILTIN)
    }

    /// Parse and validate a library from a JSON string
    ///
    /// Every entry is validated; the first invalid one aborts the load.
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let mut library = Self::new();
        library.extend_from_json(json)?;
        Ok(library)
    }

    /// Load a library from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, LibraryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Add (or replace) the entries of a JSON table into this library
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), LibraryError> {
        let entries: BTreeMap<String, DrugEntry> = serde_json::from_str(json)?;
        let mut validated = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            validated.push(DrugProfile::new(
                name,
                entry.population_clearance,
                entry.population_vd_per_kg,
                entry.therapeutic_range,
            )?);
        }
        // Only insert once the whole table is known to be valid
        for drug in validated {
            self.insert(drug);
        }
        Ok(())
    }

    /// Insert a drug, returning the profile it replaced
    pub fn insert(&mut self, drug: DrugProfile) -> Option<DrugProfile> {
        tracing::debug!(drug = drug.name(), "registering drug profile");
        self.drugs.insert(drug.name().to_string(), drug)
    }

    /// Look up a drug by name
    pub fn get(&self, name: &str) -> Result<&DrugProfile, LibraryError> {
        self.drugs
            .get(name)
            .ok_or_else(|| LibraryError::UnknownDrug(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.drugs.contains_key(name)
    }

    /// Drug names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drugs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }
}
