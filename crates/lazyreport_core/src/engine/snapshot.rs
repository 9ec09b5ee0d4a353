//! Diagnostic views of a store's engine state.
//!
//! These are read-only reports for callers and tooling, not a persistence
//! format: values are never included.

use crate::model::template::FieldKind;
use serde::Serialize;

/// Engine counters accumulated over a store's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Derivation invocations.
    pub computations: u64,
    /// Reads answered from the cache.
    pub cache_hits: u64,
    /// Cache entries evicted by writes.
    pub invalidated: u64,
}

/// Engine state of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub name: String,
    pub kind: FieldKind,
    pub cached: bool,
    /// Direct dependents, ascending.
    pub dependents: Vec<String>,
}

/// Engine state of every field, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub fields: Vec<FieldSnapshot>,
    pub stats: StoreStats,
}

impl StoreSnapshot {
    pub fn field(&self, name: &str) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Names of fields that currently hold a cached value.
    pub fn cached_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.cached)
            .map(|field| field.name.as_str())
            .collect()
    }
}
