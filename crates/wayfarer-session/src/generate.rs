//! External collaborator interfaces
//!
//! The session layer consumes two services it does not implement: a
//! content generator that produces a topic for a relationship slot, and a
//! context lookup that returns ranked background snippets for a query.
//! Both are trait objects so transports, LLM clients, and test fakes can
//! be swapped freely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wayfarer_core::RelationKind;

/// A generated topic: label plus body text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTopic {
    /// Topic label
    pub label: String,
    /// Topic body
    pub body: String,
}

impl GeneratedTopic {
    /// Create a topic
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }
}

/// Input for expanding a focus topic along one relationship kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionRequest {
    /// Title of the focus topic
    pub topic_title: String,
    /// Body of the focus topic
    pub topic_body: String,
    /// Background snippets from context lookup, best first
    pub snippets: Vec<String>,
    /// Relationship kind being filled
    pub kind: RelationKind,
    /// Exploration depth of the arrival point
    pub depth: u32,
}

/// Content generation failure, distinguishable by cause
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// The generator rejected the call for rate limiting
    #[error("content generator rate limited")]
    RateLimited,

    /// The generator rejected the caller's credentials
    #[error("content generator rejected authentication")]
    Unauthenticated,

    /// The bounded wait elapsed before the generator resolved
    #[error("content generation timed out after {waited:?}")]
    TimedOut { waited: Duration },

    /// Any other generator failure
    #[error("content generation failed: {0}")]
    Failed(String),
}

/// Context lookup failure
///
/// Callers degrade this to an empty snippet list; it never fails an
/// enclosing operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    /// Lookup backend unavailable or errored
    #[error("context lookup failed: {0}")]
    Failed(String),
}

/// Produces topic content for map bootstrap and neighbor expansion
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Synthesize the root topic for a fresh map from the user's query
    async fn seed_topic(
        &self,
        query: &str,
        snippets: &[String],
    ) -> Result<GeneratedTopic, GenerateError>;

    /// Produce the neighbor topic for one relationship slot
    async fn expand_topic(&self, req: ExpansionRequest) -> Result<GeneratedTopic, GenerateError>;
}

/// Returns ranked background snippets for a free-text query
#[async_trait]
pub trait ContextLookup: Send + Sync {
    /// Look up snippets, best first
    async fn lookup(&self, query: &str) -> Result<Vec<String>, LookupError>;
}
