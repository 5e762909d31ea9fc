//! Typed relations between topic nodes
//!
//! A relation is a directed, typed edge. The graph holds at most one
//! relation per `(source, kind)` slot; `try_link` makes that invariant
//! hold by construction (atomic insert-if-absent), which is what lets two
//! concurrent generations race for a slot safely — the loser simply
//! fails to claim it. Relations are never deleted.

use crate::ids::NodeId;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Relationship kind between two topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Drill into detail
    Deep,
    /// Adjacent topic
    Related,
    /// Alternative or competing topic
    Similar,
}

impl RelationKind {
    /// All kinds in canonical (Deep, Related, Similar) order
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Deep,
        RelationKind::Related,
        RelationKind::Similar,
    ];

    /// Canonical lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Deep => "deep",
            RelationKind::Related => "related",
            RelationKind::Similar => "similar",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed, typed edge between two topic nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
    /// Edge kind
    pub kind: RelationKind,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Graph of typed relations, keyed by `(source, kind)` slot
#[derive(Debug, Default)]
pub struct RelationGraph {
    slots: DashMap<(NodeId, RelationKind), Relation>,
}

impl RelationGraph {
    /// Create an empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the `(source, kind)` slot for `target`
    ///
    /// Atomic insert-if-absent. Returns `false` when the slot is already
    /// taken; the caller must discard its result in that case.
    pub fn try_link(&self, source: NodeId, kind: RelationKind, target: NodeId) -> bool {
        match self.slots.entry((source, kind)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Relation {
                    source,
                    target,
                    kind,
                    created_at: Utc::now(),
                });
                true
            }
        }
    }

    /// Target of the `(source, kind)` slot, if filled
    #[must_use]
    pub fn neighbor(&self, source: NodeId, kind: RelationKind) -> Option<NodeId> {
        self.slots.get(&(source, kind)).map(|r| r.target)
    }

    /// All three neighbor slots of `source` in Deep/Related/Similar order
    #[must_use]
    pub fn neighbors(&self, source: NodeId) -> [Option<NodeId>; 3] {
        RelationKind::ALL.map(|kind| self.neighbor(source, kind))
    }

    /// Relationship kinds not yet present for `source`
    #[must_use]
    pub fn missing_kinds(&self, source: NodeId) -> Vec<RelationKind> {
        RelationKind::ALL
            .into_iter()
            .filter(|kind| !self.slots.contains_key(&(source, *kind)))
            .collect()
    }

    /// Number of relations in the graph
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_link_claims_slot_once() {
        let graph = RelationGraph::new();
        let source = NodeId::new();
        let first = NodeId::new();
        let second = NodeId::new();

        assert!(graph.try_link(source, RelationKind::Deep, first));
        assert!(!graph.try_link(source, RelationKind::Deep, second));

        // Loser did not overwrite the winner.
        assert_eq!(graph.neighbor(source, RelationKind::Deep), Some(first));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn kinds_are_independent_slots() {
        let graph = RelationGraph::new();
        let source = NodeId::new();

        assert!(graph.try_link(source, RelationKind::Deep, NodeId::new()));
        assert!(graph.try_link(source, RelationKind::Related, NodeId::new()));
        assert!(graph.try_link(source, RelationKind::Similar, NodeId::new()));
        assert_eq!(graph.len(), 3);
        assert!(graph.missing_kinds(source).is_empty());
    }

    #[test]
    fn missing_kinds_reports_unfilled_slots() {
        let graph = RelationGraph::new();
        let source = NodeId::new();

        assert_eq!(graph.missing_kinds(source), RelationKind::ALL.to_vec());

        graph.try_link(source, RelationKind::Related, NodeId::new());
        assert_eq!(
            graph.missing_kinds(source),
            vec![RelationKind::Deep, RelationKind::Similar]
        );
    }

    #[test]
    fn neighbors_in_canonical_order() {
        let graph = RelationGraph::new();
        let source = NodeId::new();
        let related = NodeId::new();

        graph.try_link(source, RelationKind::Related, related);
        let [deep, rel, similar] = graph.neighbors(source);
        assert!(deep.is_none());
        assert_eq!(rel, Some(related));
        assert!(similar.is_none());
    }
}
