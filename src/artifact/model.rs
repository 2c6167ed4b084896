//! Data model for artifact browsing
//!
//! These types describe what the browser is asked to show (path/name
//! definitions) and what it hands to the grid (columns and rows keyed by
//! synthetic property names).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single raw record from the backend: lookup path -> value
pub type RawRecord = BTreeMap<String, String>;

/// A normalized grid row: synthetic property name -> value
pub type NormalizedRow = BTreeMap<String, String>;

/// Pairs a lookup path into the raw server record with a display label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathAndName {
    /// Key into the raw record (e.g., "beginning.vnf_name")
    pub path: String,

    /// Human-readable column header
    #[serde(rename = "friendlyName", alias = "friendly_name")]
    pub friendly_name: String,
}

impl PathAndName {
    pub fn new(path: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            friendly_name: friendly_name.into(),
        }
    }

    /// Parse a `path=Display Name` pair as given on the command line.
    ///
    /// The split happens on the first `=` so display names may contain one.
    /// A bare path uses itself as the display name.
    pub fn parse_pair(spec: &str) -> Option<Self> {
        let (path, name) = match spec.split_once('=') {
            Some((path, name)) => (path.trim(), name.trim()),
            None => (spec.trim(), spec.trim()),
        };
        if path.is_empty() {
            return None;
        }
        let name = if name.is_empty() { path } else { name };
        Some(Self::new(path, name))
    }
}

/// Column definition handed to the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Display name shown in the header
    pub name: String,
    /// Synthetic property name rows are keyed by (`col1`, `col2`, ...)
    pub prop: String,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, prop: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prop: prop.into(),
        }
    }
}

/// Rows plus the parallel column list produced by normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationResult {
    pub rows: Vec<NormalizedRow>,
    pub columns: Vec<ColumnDefinition>,
}
