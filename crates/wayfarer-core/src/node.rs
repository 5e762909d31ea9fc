//! Topic nodes and the node store
//!
//! A `TopicNode` is one knowledge topic: a title, a body, and whether the
//! record came out of the content generator or was seeded at map
//! bootstrap. Nodes are immutable once created and never deleted, so the
//! store exposes no mutation or removal API.

use crate::ids::NodeId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// One knowledge topic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicNode {
    /// Node identifier
    pub id: NodeId,
    /// Topic title
    pub title: String,
    /// Topic body text
    pub body: String,
    /// Whether the content generator produced this node
    pub generated: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl TopicNode {
    /// Create a hand-seeded node (map bootstrap)
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            title: title.into(),
            body: body.into(),
            generated: false,
            created_at: Utc::now(),
        }
    }

    /// Create a generator-produced node
    #[inline]
    #[must_use]
    pub fn generated(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            generated: true,
            ..Self::new(title, body)
        }
    }
}

/// Arena of immutable topic records addressed by id
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: DashMap<NodeId, TopicNode>,
}

impl NodeStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning its id
    pub fn insert(&self, node: TopicNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Fetch a node by id
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<TopicNode> {
        self.nodes.get(&id).map(|n| n.clone())
    }

    /// Whether a node exists
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of stored nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let store = NodeStore::new();
        let node = TopicNode::new("Neural Networks", "An overview.");
        let id = store.insert(node.clone());

        let fetched = store.get(id).unwrap();
        assert_eq!(fetched.title, "Neural Networks");
        assert!(!fetched.generated);
        assert!(store.contains(id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn generated_flag() {
        let node = TopicNode::generated("Backpropagation", "Detail.");
        assert!(node.generated);
    }

    #[test]
    fn missing_node_is_none() {
        let store = NodeStore::new();
        assert!(store.get(NodeId::new()).is_none());
        assert!(store.is_empty());
    }
}
