//! Field store: memoized reads, tracked dependencies, invalidating writes.
//!
//! # Responsibility
//! - Serve `get` from the cache or by running the field's derivation.
//! - Attribute every read to the field on top of the evaluation stack.
//! - Apply `set` and evict the transitive dependents of the written field.
//!
//! # Invariants
//! - A read records its dependency edge before the cache is consulted, so a
//!   cached read inside a derivation still links the two fields.
//! - `set` never runs a derivation; recomputation happens on the next `get`.
//! - A failed derivation caches nothing and leaves the stack unchanged.
//!
//! The store is single-threaded. Cache, graph and stack are updated together
//! within one call and are never observable half-updated.

use crate::engine::graph::DependencyGraph;
use crate::engine::snapshot::{FieldSnapshot, StoreSnapshot, StoreStats};
use crate::engine::stack::EvaluationStack;
use crate::error::{ReportError, ReportResult};
use crate::model::options::{DerivedWritePolicy, StoreOptions};
use crate::model::template::{FieldKind, Template, TemplateEntry};
use log::{debug, trace, warn};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Lazy, dependency-tracked container of named fields.
pub struct FieldStore<V> {
    template: Template<V>,
    options: StoreOptions,
    cache: RefCell<BTreeMap<String, V>>,
    graph: RefCell<DependencyGraph>,
    stack: EvaluationStack,
    stats: Cell<StoreStats>,
}

impl<V: Clone> FieldStore<V> {
    /// Builds a store from an optional template.
    ///
    /// # Errors
    /// - `MissingTemplate` when `template` is `None`.
    pub fn create(template: Option<Template<V>>) -> ReportResult<Self> {
        Self::create_with_options(template, StoreOptions::default())
    }

    /// Same as [`FieldStore::create`] with explicit options.
    pub fn create_with_options(
        template: Option<Template<V>>,
        options: StoreOptions,
    ) -> ReportResult<Self> {
        match template {
            Some(template) => Ok(Self::with_options(template, options)),
            None => {
                warn!("event=store_create module=engine status=error reason=missing_template");
                Err(ReportError::MissingTemplate)
            }
        }
    }

    pub fn new(template: Template<V>) -> Self {
        Self::with_options(template, StoreOptions::default())
    }

    pub fn with_options(template: Template<V>, options: StoreOptions) -> Self {
        let derived = template
            .names()
            .filter(|name| template.kind(name) == Some(FieldKind::Derived))
            .count();
        debug!(
            "event=store_create module=engine status=ok fields={} derived={} derived_writes={:?}",
            template.len(),
            derived,
            options.derived_writes
        );

        Self {
            template,
            options,
            cache: RefCell::new(BTreeMap::new()),
            graph: RefCell::new(DependencyGraph::new()),
            stack: EvaluationStack::new(),
            stats: Cell::new(StoreStats::default()),
        }
    }

    /// Reads `name`, computing and caching it when no cached value exists.
    ///
    /// Called by derivations to read sibling fields; such reads are recorded
    /// as dependencies of the field being computed.
    ///
    /// # Errors
    /// - `UnknownField` when `name` is not in the template.
    /// - `CyclicDependency` when `name` is already being computed.
    /// - Any error returned by the derivation of `name` or of a field it reads.
    ///
    /// # Panics
    /// Never panics itself, but each nested read recurses on the caller's
    /// thread: a chain of N uncached derived fields needs stack for N levels
    /// of `get` plus the derivation closure. Very deep chains must run on a
    /// thread with a large enough stack.
    pub fn get(&self, name: &str) -> ReportResult<V> {
        let entry = self.entry(name)?;

        // Why: the edge must exist even when the read is served from cache,
        // otherwise a later write to `name` would miss the dependent.
        if let Some(dependent) = self.stack.top() {
            if self.graph.borrow_mut().record(name, &dependent) {
                trace!("event=dependency_record module=engine field={name} dependent={dependent}");
            }
        }

        if let Some(value) = self.cache.borrow().get(name) {
            self.bump(|stats| stats.cache_hits += 1);
            trace!("event=cache_hit module=engine field={name}");
            return Ok(value.clone());
        }

        let frame = self.stack.enter(name).map_err(|err| {
            warn!("event=field_compute module=engine status=error field={name} error={err}");
            err
        })?;

        let value = match entry {
            TemplateEntry::Stored(initial) => initial.clone(),
            TemplateEntry::Derived(compute) => {
                self.bump(|stats| stats.computations += 1);
                debug!(
                    "event=field_compute module=engine field={name} depth={}",
                    self.stack.depth()
                );
                compute(self)?
            }
        };

        self.cache
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        // Why: the frame stays pushed until the value is cached, so reads that
        // happen during the computation are attributed to `name`.
        drop(frame);

        Ok(value)
    }

    /// Writes `value` into `name` and evicts every field depending on it.
    ///
    /// The written field itself stays cached with the new value.
    ///
    /// # Errors
    /// - `UnknownField` when `name` is not in the template.
    /// - `ReadOnlyField` when `name` is derived and the store rejects
    ///   derived writes; the cached value is left untouched.
    pub fn set(&mut self, name: &str, value: V) -> ReportResult<()> {
        let kind = self.entry(name)?.kind();
        if kind == FieldKind::Derived && self.options.derived_writes == DerivedWritePolicy::Reject {
            warn!("event=field_set module=engine status=rejected field={name} reason=derived");
            return Err(ReportError::ReadOnlyField(name.to_string()));
        }

        self.cache.get_mut().insert(name.to_string(), value);
        let evicted = self.invalidate(name);
        debug!(
            "event=field_set module=engine status=ok field={name} kind={kind:?} evicted={evicted}"
        );
        Ok(())
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn template(&self) -> &Template<V> {
        &self.template
    }

    pub fn contains(&self, name: &str) -> bool {
        self.template.contains(name)
    }

    /// Field names in ascending order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.template.names()
    }

    pub fn field_kind(&self, name: &str) -> ReportResult<FieldKind> {
        self.entry(name).map(TemplateEntry::kind)
    }

    /// Whether `name` currently holds a value that `get` would return as-is.
    pub fn is_cached(&self, name: &str) -> ReportResult<bool> {
        self.entry(name)?;
        Ok(self.cache.borrow().contains_key(name))
    }

    /// Fields that read `name` during one of their computations.
    pub fn dependents_of(&self, name: &str) -> ReportResult<Vec<String>> {
        self.entry(name)?;
        Ok(self.graph.borrow().dependents_of(name))
    }

    pub fn stats(&self) -> StoreStats {
        self.stats.get()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let cache = self.cache.borrow();
        let graph = self.graph.borrow();
        let fields = self
            .template
            .names()
            .filter_map(|name| {
                self.template.kind(name).map(|kind| FieldSnapshot {
                    name: name.to_string(),
                    kind,
                    cached: cache.contains_key(name),
                    dependents: graph.dependents_of(name),
                })
            })
            .collect();

        StoreSnapshot {
            fields,
            stats: self.stats.get(),
        }
    }

    /// Evicts the transitive dependents of `root`, returning how many cache
    /// entries were dropped. Never recomputes anything.
    fn invalidate(&mut self, root: &str) -> usize {
        let scope = self.graph.get_mut().transitive_dependents(root);
        let cache = self.cache.get_mut();
        let evicted = scope
            .iter()
            .filter(|field| cache.remove(field.as_str()).is_some())
            .count();

        if !scope.is_empty() {
            debug!(
                "event=cache_invalidate module=engine root={root} dependents={} evicted={evicted} fields={:?}",
                scope.len(),
                scope
            );
        }
        self.bump(|stats| stats.invalidated += evicted as u64);
        evicted
    }

    fn entry(&self, name: &str) -> ReportResult<&TemplateEntry<V>> {
        self.template
            .get(name)
            .ok_or_else(|| ReportError::UnknownField(name.to_string()))
    }

    fn bump(&self, update: impl FnOnce(&mut StoreStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl<V: Debug> Debug for FieldStore<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldStore")
            .field("template", &self.template)
            .field("options", &self.options)
            .field("cache", &self.cache)
            .field("graph", &self.graph)
            .field("stats", &self.stats.get())
            .finish()
    }
}
