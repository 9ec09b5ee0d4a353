//! Field template model.
//!
//! # Responsibility
//! - Describe each field as either a stored value or a derivation.
//! - Fix the universe of valid field names for one report.
//!
//! # Invariants
//! - A field's kind is decided when the entry is created and never changes.
//! - The template is never mutated by the store that owns it.

use crate::engine::store::FieldStore;
use crate::error::ReportResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Derivation body: a pure function of the other fields of the same store.
pub type ComputeFn<V> = dyn Fn(&FieldStore<V>) -> ReportResult<V>;

/// Kind classification of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Holds a directly assigned value, writable via `set`.
    Stored,
    /// Computed from other fields, read-only by default.
    Derived,
}

/// One template entry.
pub enum TemplateEntry<V> {
    /// Initial value of a stored field.
    Stored(V),
    /// Compute function of a derived field.
    Derived(Box<ComputeFn<V>>),
}

impl<V> TemplateEntry<V> {
    pub fn stored(value: V) -> Self {
        Self::Stored(value)
    }

    pub fn derived<F>(compute: F) -> Self
    where
        F: Fn(&FieldStore<V>) -> ReportResult<V> + 'static,
    {
        Self::Derived(Box::new(compute))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Stored(_) => FieldKind::Stored,
            Self::Derived(_) => FieldKind::Derived,
        }
    }
}

impl<V: Debug> Debug for TemplateEntry<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored(value) => f.debug_tuple("Stored").field(value).finish(),
            Self::Derived(_) => f.write_str("Derived(<fn>)"),
        }
    }
}

/// Immutable description of every field a report exposes.
///
/// Inserting a name twice keeps the last entry, like any map literal.
pub struct Template<V> {
    entries: BTreeMap<String, TemplateEntry<V>>,
}

impl<V> Default for Template<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> Template<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stored field with its initial value.
    pub fn stored(mut self, name: impl Into<String>, value: V) -> Self {
        self.insert(name, TemplateEntry::Stored(value));
        self
    }

    /// Adds a derived field computed by `compute`.
    pub fn derived<F>(mut self, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&FieldStore<V>) -> ReportResult<V> + 'static,
    {
        self.insert(name, TemplateEntry::derived(compute));
        self
    }

    /// Inserts one entry, returning the entry it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: TemplateEntry<V>,
    ) -> Option<TemplateEntry<V>> {
        self.entries.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&TemplateEntry<V>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.entries.get(name).map(TemplateEntry::kind)
    }

    /// Field names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Debug> Debug for Template<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, TemplateEntry<V>)> for Template<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, TemplateEntry<V>)>>(iter: I) -> Self {
        let mut template = Self::new();
        for (name, entry) in iter {
            template.insert(name, entry);
        }
        template
    }
}
