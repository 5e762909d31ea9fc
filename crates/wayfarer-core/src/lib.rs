//! Wayfarer Core - topic graph and navigation forest
//!
//! The domain model for branching exploration sessions:
//! - Immutable topic records and their typed relations
//! - An append-only log of navigation steps forming a forest of branches
//! - The placement decision for every forward move (revisit / extend / fork)
//! - Read-only branch projections with fork descriptors
//!
//! All stores are arenas of immutable records addressed by id. The single
//! mutable field in the whole model is `MapRecord::current_step_id`;
//! "going back" only moves that pointer, it never deletes a step.
//!
//! # Example
//!
//! ```rust
//! use wayfarer_core::prelude::*;
//!
//! let nodes = NodeStore::new();
//! let root = TopicNode::new("Neural Networks", "An overview.");
//! let root_id = nodes.insert(root);
//!
//! let steps = StepLog::new();
//! let map_id = MapId::new();
//! let first = steps.append(NavigationStep::initial(map_id, root_id));
//! assert_eq!(first.step_index, 0);
//! assert!(first.parent_step_id.is_none());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod branches;
pub mod error;
pub mod ids;
pub mod node;
pub mod relation;
pub mod resolver;
pub mod step;

// Re-exports for convenience
pub use branches::{branch_views, BranchView, ForkPoint};
pub use error::CoreError;
pub use ids::{BranchId, MapId, NodeId, StepId};
pub use node::{NodeStore, TopicNode};
pub use relation::{Relation, RelationGraph, RelationKind};
pub use resolver::{resolve_placement, Placement};
pub use step::{Direction, MapRecord, MapStore, NavigationStep, StepLog};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the Wayfarer domain model
    pub use crate::{
        branch_views, resolve_placement, BranchId, BranchView, CoreError, Direction, MapId,
        MapRecord, MapStore, NavigationStep, NodeId, NodeStore, Placement, Relation,
        RelationGraph, RelationKind, StepId, StepLog, TopicNode,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
