//! Canonical index identifier lookup.
//!
//! Resolves a raw index sequence plus its index type to the canonical
//! identifier printed on sample sheets (e.g. an I7 plate position). Misses
//! are not errors: the identifier is advisory display data and degrades to
//! an empty cell.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::model::IndexTypeId;

/// One row of an index table in a store snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Canonical identifier, e.g. "A701"
    pub index_id: String,
    /// Raw index sequence
    pub index: String,
    pub index_type: IndexTypeId,
}

/// Read-only lookup tables for I7 and I5 indices, keyed by
/// `(sequence, index type)`.
#[derive(Debug, Default, Clone)]
pub struct IndexLookup {
    i7: AHashMap<(String, IndexTypeId), String>,
    i5: AHashMap<(String, IndexTypeId), String>,
}

impl IndexLookup {
    /// Build the lookup from snapshot index tables.
    #[must_use]
    pub fn new(i7_entries: &[IndexEntry], i5_entries: &[IndexEntry]) -> Self {
        let to_map = |entries: &[IndexEntry]| {
            entries
                .iter()
                .map(|e| ((e.index.clone(), e.index_type), e.index_id.clone()))
                .collect::<AHashMap<_, _>>()
        };
        IndexLookup { i7: to_map(i7_entries), i5: to_map(i5_entries) }
    }

    /// Resolve an I7 sequence to its canonical identifier.
    #[must_use]
    pub fn resolve_i7(&self, sequence: &str, index_type: IndexTypeId) -> Option<&str> {
        self.i7.get(&(sequence.to_string(), index_type)).map(String::as_str)
    }

    /// Resolve an I5 sequence to its canonical identifier.
    #[must_use]
    pub fn resolve_i5(&self, sequence: &str, index_type: IndexTypeId) -> Option<&str> {
        self.i5.get(&(sequence.to_string(), index_type)).map(String::as_str)
    }
}
