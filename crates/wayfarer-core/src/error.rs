//! Error types for the Wayfarer domain model
//!
//! Every variant carries the identifying id so failures can be logged and
//! correlated by an external observability collaborator. NotFound and
//! InvariantViolation always abort an operation before any mutation is
//! committed.

use crate::ids::{MapId, NodeId, StepId};

/// Domain-model error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Referenced map does not exist
    #[error("map not found: {0}")]
    MapNotFound(MapId),

    /// Referenced step does not exist
    #[error("step not found: {0}")]
    StepNotFound(StepId),

    /// Referenced node does not exist
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Operation conflicts with the step forest's invariants
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl CoreError {
    /// Build an invariant violation with a formatted message
    #[inline]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Whether this error is a missing-entity error
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MapNotFound(_) | Self::StepNotFound(_) | Self::NodeNotFound(_)
        )
    }
}
