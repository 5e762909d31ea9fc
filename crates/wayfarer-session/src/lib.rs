//! Wayfarer Session - exploration session orchestration
//!
//! The orchestration layer over the Wayfarer domain model:
//! - `MapSession`, the controller for create / resume / forward / back
//! - Neighbor fan-out against an external content generator
//! - External-collaborator traits (content generator, context lookup)
//! - A serde command surface for the transport layer
//!
//! Each map behaves as a single-writer actor: mutations against the same
//! map are serialized behind a per-map lock, maps are independent.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wayfarer_session::{MapSession, SessionConfig};
//!
//! # async fn example(generator: Arc<dyn wayfarer_session::ContentGenerator>,
//! #                  context: Arc<dyn wayfarer_session::ContextLookup>)
//! #     -> Result<(), wayfarer_session::SessionError> {
//! let session = MapSession::new(generator, context, SessionConfig::new());
//!
//! let view = session.create_map("Neural Networks").await?;
//! println!("focus: {}", view.focus.title);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod command;
pub mod config;
pub mod error;
pub mod generate;
pub mod neighbors;
pub mod session;
pub mod telemetry;
pub mod view;

// Re-exports for convenience
pub use command::{Command, CommandReply};
pub use config::SessionConfig;
pub use error::SessionError;
pub use generate::{
    ContentGenerator, ContextLookup, ExpansionRequest, GenerateError, GeneratedTopic, LookupError,
};
pub use neighbors::{NeighborGenerator, NeighborSet};
pub use session::{MapSession, SessionStores};
pub use view::{ForwardOutcome, MapView};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Wayfarer sessions
    pub use crate::{
        Command, CommandReply, ContentGenerator, ContextLookup, ForwardOutcome, GenerateError,
        GeneratedTopic, MapSession, MapView, SessionConfig, SessionError,
    };
    pub use wayfarer_core::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
