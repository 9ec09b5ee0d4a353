//! Error taxonomy for report construction, reads and writes.
//!
//! # Invariants
//! - Every error is synchronous and reaches the caller of
//!   `create`/`get`/`set` unchanged; nothing is retried internally.
//! - Errors never leave a partially computed value in the cache.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ReportResult<T> = Result<T, ReportError>;

/// Failure raised by the field store or by a derivation it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Construction was attempted without a template.
    MissingTemplate,
    /// Field name is not part of the template.
    UnknownField(String),
    /// Write targeted a derived field while derived writes are rejected.
    ReadOnlyField(String),
    /// A derivation read its own field, directly or through other fields.
    ///
    /// `stack` is the evaluation chain at the time of detection, outermost
    /// first, ending with the field that was about to be pushed again.
    CyclicDependency { field: String, stack: Vec<String> },
    /// A derivation reported its own failure.
    Derivation { field: String, message: String },
}

impl ReportError {
    /// Builds a derivation failure for `field`.
    ///
    /// Intended for use inside compute functions that cannot produce a value.
    pub fn derivation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Derivation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the field name this error is about, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingTemplate => None,
            Self::UnknownField(field) | Self::ReadOnlyField(field) => Some(field),
            Self::CyclicDependency { field, .. } | Self::Derivation { field, .. } => Some(field),
        }
    }
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTemplate => write!(f, "required argument \"template\" is not passed"),
            Self::UnknownField(field) => write!(f, "field \"{field}\" is not defined in template"),
            Self::ReadOnlyField(field) => write!(f, "Dynamic field \"{field}\" cannot be set"),
            Self::CyclicDependency { field, stack } => write!(
                f,
                "cyclic dependency on field \"{field}\": {}",
                stack.join(" -> ")
            ),
            Self::Derivation { field, message } => {
                write!(f, "failed to compute field \"{field}\": {message}")
            }
        }
    }
}

impl Error for ReportError {}
