//! Input-side model for reports.
//!
//! # Responsibility
//! - Define the template that classifies fields as stored or derived.
//! - Define construction options consumed by the engine.
//!
//! # Invariants
//! - Everything here is fixed once a store is built from it.

pub mod options;
pub mod template;
