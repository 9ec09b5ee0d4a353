//! Lazy, dependency-tracked computed-field reports.
//!
//! A report is a set of named fields, each either a stored value or a pure
//! function of the other fields. Reads are memoized; writing a stored field
//! evicts every field whose computation depended on it, directly or
//! transitively.

pub mod engine;
pub mod error;
pub mod logging;
pub mod model;

pub use engine::snapshot::{FieldSnapshot, StoreSnapshot, StoreStats};
pub use engine::store::FieldStore;
pub use error::{ReportError, ReportResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::options::{DerivedWritePolicy, StoreOptions};
pub use model::template::{ComputeFn, FieldKind, Template, TemplateEntry};

/// Builds a report from an optional template.
///
/// Shorthand for [`FieldStore::create`].
pub fn create_report<V: Clone>(template: Option<Template<V>>) -> ReportResult<FieldStore<V>> {
    FieldStore::create(template)
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
