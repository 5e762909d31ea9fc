//! Session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for map sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bounded wait for a single content-generator call; exceeding it is
    /// a generation error, without retry
    pub generation_timeout: Duration,
    /// Maximum context snippets forwarded to the generator
    pub max_snippets: usize,
    /// Maximum distinct branches per map before forks are refused
    pub max_branches_per_map: usize,
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With generation timeout
    #[inline]
    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// With snippet cap
    #[inline]
    #[must_use]
    pub fn with_max_snippets(mut self, max: usize) -> Self {
        self.max_snippets = max;
        self
    }

    /// With branch cap
    #[inline]
    #[must_use]
    pub fn with_max_branches(mut self, max: usize) -> Self {
        self.max_branches_per_map = max;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(30),
            max_snippets: 5,
            max_branches_per_map: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.max_snippets, 5);
        assert_eq!(config.max_branches_per_map, 64);
    }

    #[test]
    fn builders() {
        let config = SessionConfig::new()
            .with_generation_timeout(Duration::from_millis(50))
            .with_max_snippets(2)
            .with_max_branches(8);
        assert_eq!(config.generation_timeout, Duration::from_millis(50));
        assert_eq!(config.max_snippets, 2);
        assert_eq!(config.max_branches_per_map, 8);
    }
}
