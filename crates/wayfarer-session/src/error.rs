//! Error types for the session layer
//!
//! NotFound and InvariantViolation abort an operation before any mutation
//! commits; the map is left exactly as before the call. A generation
//! error confined to one neighbor slot never surfaces here — the slot is
//! simply `None` in the view. Map bootstrap is the exception: there any
//! generation failure fails the whole call.

use crate::generate::GenerateError;
use wayfarer_core::{CoreError, MapId};

/// Session-layer error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Domain-model failure (not found / invariant violation)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Content generation failed for an operation that requires it
    #[error("generation failed for map {map_id}: {source}")]
    Generation {
        /// Map the operation was building or mutating
        map_id: MapId,
        /// Underlying generator failure
        source: GenerateError,
    },
}

impl SessionError {
    /// Attach map context to a generator failure
    #[inline]
    #[must_use]
    pub fn generation(map_id: MapId, source: GenerateError) -> Self {
        Self::Generation { map_id, source }
    }

    /// Whether this is a missing-entity error
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Core(core) if core.is_not_found())
    }

    /// Whether this is an invariant violation
    #[inline]
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Core(CoreError::InvariantViolation(_)))
    }

    /// Whether this is a generation failure
    #[inline]
    #[must_use]
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::StepId;

    #[test]
    fn core_errors_pass_through() {
        let err = SessionError::from(CoreError::StepNotFound(StepId::new()));
        assert!(err.is_not_found());
        assert!(!err.is_generation());
    }

    #[test]
    fn generation_error_carries_map_id() {
        let map_id = MapId::new();
        let err = SessionError::generation(map_id, GenerateError::RateLimited);
        assert!(err.is_generation());
        assert!(err.to_string().contains(&map_id.to_string()));
    }

    #[test]
    fn invariant_classification() {
        let err = SessionError::from(CoreError::invariant("no parent"));
        assert!(err.is_invariant_violation());
        assert!(!err.is_not_found());
    }
}
