//! View models returned to callers

use crate::neighbors::NeighborSet;
use serde::{Deserialize, Serialize};
use wayfarer_core::{BranchId, MapId, NavigationStep, StepId, TopicNode};

/// The bundle returned after any session operation: the focus node, its
/// up-to-three neighbors, and the current path coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Map identifier
    pub map_id: MapId,
    /// The step the user is standing on
    pub current_step_id: StepId,
    /// Branch of the current step
    pub current_branch_id: BranchId,
    /// Index of the current step within its branch
    pub current_step_index: u32,
    /// The node the user is currently viewing
    pub focus: TopicNode,
    /// Deep neighbor; `None` while generation has not yet succeeded
    pub deep_neighbor: Option<TopicNode>,
    /// Related neighbor; `None` while generation has not yet succeeded
    pub related_neighbor: Option<TopicNode>,
    /// Similar neighbor; `None` while generation has not yet succeeded
    pub similar_neighbor: Option<TopicNode>,
}

impl MapView {
    /// Assemble a view from a step, its focus node, and a neighbor set
    #[must_use]
    pub fn assemble(step: &NavigationStep, focus: TopicNode, neighbors: NeighborSet) -> Self {
        Self {
            map_id: step.map_id,
            current_step_id: step.id,
            current_branch_id: step.branch_id,
            current_step_index: step.step_index,
            focus,
            deep_neighbor: neighbors.deep,
            related_neighbor: neighbors.related,
            similar_neighbor: neighbors.similar,
        }
    }
}

/// Result of a forward navigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardOutcome {
    /// The updated view
    pub view: MapView,
    /// Set when this navigation forked a new branch; used by engagement
    /// bookkeeping outside this crate
    pub discovered_branch: Option<BranchId>,
}
