//! Store configuration.
//!
//! Options are plain data so hosts can keep them in their own config files.

use serde::{Deserialize, Serialize};

/// How `set` treats a derived field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedWritePolicy {
    /// Writes to derived fields fail with `ReportError::ReadOnlyField`.
    #[default]
    Reject,
    /// Writes replace the cached value until the next invalidation reaches
    /// the field, after which the derivation runs again.
    ///
    /// Invalidation only follows edges recorded by earlier computations. An
    /// override written before the field was ever computed has no edges to
    /// its inputs, so writing those inputs does not clear it; it lasts until
    /// some field it depends on through a recorded edge is written.
    Override,
}

/// Construction-time options for a `FieldStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub derived_writes: DerivedWritePolicy,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_derived_writes(mut self, policy: DerivedWritePolicy) -> Self {
        self.derived_writes = policy;
        self
    }
}
