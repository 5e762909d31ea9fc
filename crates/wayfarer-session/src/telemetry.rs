//! Tracing setup
//!
//! One-call subscriber initialization for binaries and integration
//! tests. Filtering follows `RUST_LOG`, defaulting to `info` for the
//! wayfarer crates when unset.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global tracing subscriber
///
/// Idempotent: repeated calls (and calls racing an already-installed
/// subscriber, as happens across test binaries) are no-ops.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("wayfarer_core=info,wayfarer_session=info"));
        // try_init so an outer subscriber (e.g. a test harness) wins.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
