//! Evaluation, caching and invalidation engine.
//!
//! # Responsibility
//! - Memoize field reads and attribute each read to the field being computed.
//! - Evict every transitive dependent of a written field.
//!
//! # Invariants
//! - Dependency edges are recorded before the cache is consulted.
//! - The evaluation stack is empty whenever no `get` is in progress.
//! - Dependency edges are only ever added; stale edges cost a redundant
//!   recomputation, never a stale read.

pub(crate) mod graph;
pub mod snapshot;
pub(crate) mod stack;
pub mod store;
