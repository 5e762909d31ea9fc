//! Neighbor generation fan-out
//!
//! For a focus node, every relationship kind without an edge gets one
//! generation task; the three kinds run concurrently and are joined with
//! tolerance for individual failure. A failed slot stays empty in the
//! returned set and is retried transparently the next time the node
//! becomes a focus node, because the missing-kind check re-runs.
//!
//! Duplicate protection: a finished generation claims its `(source,
//! kind)` slot through `RelationGraph::try_link`; if another in-flight
//! generation won the slot first, the result is discarded.

use crate::config::SessionConfig;
use crate::generate::{ContentGenerator, ExpansionRequest, GenerateError, GeneratedTopic};
use std::sync::Arc;
use wayfarer_core::{NodeId, NodeStore, RelationGraph, RelationKind, TopicNode};

/// The up-to-three neighbor topics of a focus node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborSet {
    /// Deep neighbor, if materialized
    pub deep: Option<TopicNode>,
    /// Related neighbor, if materialized
    pub related: Option<TopicNode>,
    /// Similar neighbor, if materialized
    pub similar: Option<TopicNode>,
}

impl NeighborSet {
    /// Read the currently materialized neighbors of `source`
    #[must_use]
    pub fn materialize(source: NodeId, nodes: &NodeStore, relations: &RelationGraph) -> Self {
        let fetch = |kind| {
            relations
                .neighbor(source, kind)
                .and_then(|target| nodes.get(target))
        };
        Self {
            deep: fetch(RelationKind::Deep),
            related: fetch(RelationKind::Related),
            similar: fetch(RelationKind::Similar),
        }
    }

    /// Neighbor for one kind
    #[must_use]
    pub fn get(&self, kind: RelationKind) -> Option<&TopicNode> {
        match kind {
            RelationKind::Deep => self.deep.as_ref(),
            RelationKind::Related => self.related.as_ref(),
            RelationKind::Similar => self.similar.as_ref(),
        }
    }

    /// Number of filled slots
    #[must_use]
    pub fn filled(&self) -> usize {
        RelationKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .count()
    }
}

/// Fills missing relationship slots of a node via the content generator
pub struct NeighborGenerator {
    generator: Arc<dyn ContentGenerator>,
    nodes: Arc<NodeStore>,
    relations: Arc<RelationGraph>,
    config: SessionConfig,
}

impl NeighborGenerator {
    /// Create a neighbor generator over the given stores
    #[must_use]
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        nodes: Arc<NodeStore>,
        relations: Arc<RelationGraph>,
        config: SessionConfig,
    ) -> Self {
        Self {
            generator,
            nodes,
            relations,
            config,
        }
    }

    /// Synthesize a root topic, bounded by the generation timeout
    pub async fn seed(
        &self,
        query: &str,
        snippets: &[String],
    ) -> Result<GeneratedTopic, GenerateError> {
        self.bounded(self.generator.seed_topic(query, snippets))
            .await
    }

    /// Generate all three neighbor topics, failing on the first error
    ///
    /// Used by map bootstrap, where generation is all-or-nothing. The
    /// three calls still run concurrently; nothing is persisted here.
    pub async fn expand_required(
        &self,
        topic_title: &str,
        topic_body: &str,
        snippets: &[String],
        depth: u32,
    ) -> Result<Vec<(RelationKind, GeneratedTopic)>, GenerateError> {
        let tasks = RelationKind::ALL.map(|kind| {
            let req = self.request(topic_title, topic_body, snippets, kind, depth);
            async move { (kind, self.bounded(self.generator.expand_topic(req)).await) }
        });

        let mut topics = Vec::with_capacity(RelationKind::ALL.len());
        for (kind, result) in futures::future::join_all(tasks).await {
            topics.push((kind, result?));
        }
        Ok(topics)
    }

    /// Fill the missing neighbor slots of `focus`, tolerating per-slot
    /// failure, then return whatever is materialized
    pub async fn fill(&self, focus: &TopicNode, snippets: &[String], depth: u32) -> NeighborSet {
        let missing = self.relations.missing_kinds(focus.id);
        if !missing.is_empty() {
            let tasks = missing
                .into_iter()
                .map(|kind| self.fill_slot(focus, kind, snippets, depth));
            futures::future::join_all(tasks).await;
        }
        NeighborSet::materialize(focus.id, &self.nodes, &self.relations)
    }

    async fn fill_slot(
        &self,
        focus: &TopicNode,
        kind: RelationKind,
        snippets: &[String],
        depth: u32,
    ) {
        let req = self.request(&focus.title, &focus.body, snippets, kind, depth);
        match self.bounded(self.generator.expand_topic(req)).await {
            Ok(topic) => {
                let node = TopicNode::generated(topic.label, topic.body);
                let node_id = self.nodes.insert(node);
                if self.relations.try_link(focus.id, kind, node_id) {
                    tracing::debug!(source = %focus.id, target = %node_id, %kind, "neighbor linked");
                } else {
                    tracing::debug!(source = %focus.id, %kind, "slot already claimed, result discarded");
                }
            }
            Err(error) => {
                tracing::warn!(source = %focus.id, %kind, %error, "neighbor generation failed");
            }
        }
    }

    fn request(
        &self,
        topic_title: &str,
        topic_body: &str,
        snippets: &[String],
        kind: RelationKind,
        depth: u32,
    ) -> ExpansionRequest {
        ExpansionRequest {
            topic_title: topic_title.to_string(),
            topic_body: topic_body.to_string(),
            snippets: snippets.to_vec(),
            kind,
            depth,
        }
    }

    async fn bounded<F>(&self, call: F) -> Result<GeneratedTopic, GenerateError>
    where
        F: std::future::Future<Output = Result<GeneratedTopic, GenerateError>>,
    {
        match tokio::time::timeout(self.config.generation_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerateError::TimedOut {
                waited: self.config.generation_timeout,
            }),
        }
    }
}
