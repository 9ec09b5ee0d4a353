//! Dependency graph between fields.
//!
//! # Responsibility
//! - Remember which fields read which, as observed during computations.
//! - Answer the invalidation scope of a write.
//!
//! # Invariants
//! - Edges are append-only; recomputing a field never removes old edges.
//! - Traversal visits every node at most once, cycles included.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Mapping from a field to the fields that read it ("dependents").
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    dependents: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `dependent` read `dependency`.
    ///
    /// Returns `true` when the edge was not known before.
    pub fn record(&mut self, dependency: &str, dependent: &str) -> bool {
        self.dependents
            .entry(dependency.to_string())
            .or_default()
            .insert(dependent.to_string())
    }

    /// Direct dependents of `field`, in ascending order.
    pub fn dependents_of(&self, field: &str) -> Vec<String> {
        self.dependents
            .get(field)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every field reachable from `root` through dependent edges, excluding
    /// `root` itself.
    pub fn transitive_dependents(&self, root: &str) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<&str> = self.direct(root).collect();

        while let Some(field) = queue.pop_front() {
            if field == root || visited.contains(field) {
                continue;
            }
            visited.insert(field.to_string());
            queue.extend(self.direct(field));
        }

        visited
    }

    #[cfg(test)]
    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(BTreeSet::len).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }

    fn direct<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.dependents
            .get(field)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::DependencyGraph;
    use std::collections::BTreeSet;

    fn names(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn record_reports_new_edges_only() {
        let mut graph = DependencyGraph::new();
        assert!(graph.record("A", "B"));
        assert!(!graph.record("A", "B"));
        assert!(graph.record("A", "C"));

        assert_eq!(graph.dependents_of("A"), vec!["B".to_string(), "C".to_string()]);
        assert!(graph.dependents_of("B").is_empty());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn closure_follows_chains_and_diamonds() {
        let mut graph = DependencyGraph::new();
        graph.record("A", "B");
        graph.record("A", "C");
        graph.record("B", "D");
        graph.record("C", "D");
        graph.record("D", "E");
        graph.record("X", "Y");

        assert_eq!(graph.transitive_dependents("A"), names(&["B", "C", "D", "E"]));
        assert_eq!(graph.transitive_dependents("D"), names(&["E"]));
        assert!(graph.transitive_dependents("E").is_empty());
    }

    #[test]
    fn closure_terminates_on_cycles_and_excludes_root() {
        let mut graph = DependencyGraph::new();
        graph.record("A", "B");
        graph.record("B", "C");
        graph.record("C", "A");
        graph.record("B", "B");

        assert_eq!(graph.transitive_dependents("A"), names(&["B", "C"]));
    }

    #[test]
    fn unknown_root_has_no_dependents() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(graph.transitive_dependents("missing").is_empty());
    }
}
