//! Serde command surface
//!
//! Tagged request/reply enums for driving a [`MapSession`] from a
//! transport layer, plus the dispatch entry point. The transport only
//! ever needs `serde_json::from_str` on the way in and `to_string` on
//! the way out.

use crate::session::MapSession;
use crate::view::MapView;
use crate::SessionError;
use serde::{Deserialize, Serialize};
use wayfarer_core::{BranchId, BranchView, Direction, MapId, NodeId, StepId};

/// A session operation, as received from the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Create a map from a user query
    CreateMap {
        /// Seed query
        query: String,
    },
    /// Resume a map at its current step
    ResumeMap {
        /// Map to resume
        map_id: MapId,
    },
    /// Navigate from the current step to a target node
    NavigateForward {
        map_id: MapId,
        current_step_id: StepId,
        current_branch_id: BranchId,
        target_node_id: NodeId,
        direction: Direction,
    },
    /// Navigate back to the current step's parent
    NavigateBack {
        current_step_id: StepId,
        current_branch_id: BranchId,
    },
    /// Project the branch list of a map
    GetBranches {
        /// Map to project
        map_id: MapId,
    },
}

/// Reply to a [`Command`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandReply {
    /// A map view, from create / resume / back
    Map {
        /// Current view of the map
        view: MapView,
    },
    /// Outcome of a forward navigation
    Forward {
        /// Current view of the map
        view: MapView,
        /// Newly created branch, if the navigation forked
        discovered_branch: Option<BranchId>,
    },
    /// Branch projection of a map
    Branches {
        /// One entry per branch, in discovery order
        branches: Vec<BranchView>,
    },
}

impl MapSession {
    /// Dispatch a single command
    pub async fn execute(&self, command: Command) -> Result<CommandReply, SessionError> {
        match command {
            Command::CreateMap { query } => {
                let view = self.create_map(&query).await?;
                Ok(CommandReply::Map { view })
            }
            Command::ResumeMap { map_id } => {
                let view = self.resume_map(map_id).await?;
                Ok(CommandReply::Map { view })
            }
            Command::NavigateForward {
                map_id,
                current_step_id,
                current_branch_id,
                target_node_id,
                direction,
            } => {
                let outcome = self
                    .navigate_forward(
                        map_id,
                        current_step_id,
                        current_branch_id,
                        target_node_id,
                        direction,
                    )
                    .await?;
                Ok(CommandReply::Forward {
                    view: outcome.view,
                    discovered_branch: outcome.discovered_branch,
                })
            }
            Command::NavigateBack {
                current_step_id,
                current_branch_id,
            } => {
                let view = self
                    .navigate_back(current_step_id, current_branch_id)
                    .await?;
                Ok(CommandReply::Map { view })
            }
            Command::GetBranches { map_id } => {
                let branches = self.branches(map_id)?;
                Ok(CommandReply::Branches { branches })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_json_shape_is_stable() {
        let cmd = Command::CreateMap {
            query: "Neural Networks".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "create_map", "query": "Neural Networks"})
        );
    }

    #[test]
    fn command_round_trips() {
        let cmd = Command::NavigateBack {
            current_step_id: StepId::new(),
            current_branch_id: BranchId::new(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn reply_tag_is_snake_case() {
        let reply = CommandReply::Branches {
            branches: Vec::new(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["result"], "branches");
    }
}
