//! Branch placement resolution
//!
//! For each forward move the resolver decides, without writing anything,
//! whether the move is a revisit of a step already in the current branch,
//! an extension of the current branch, or the fork of a new branch.
//!
//! The fork trigger is global recency: a new row forks if and only if the
//! step being left is not the map's most-recently-created step, across
//! all branches. Whether the current step is a leaf of its own branch is
//! deliberately not consulted.

use crate::ids::{BranchId, NodeId, StepId};
use crate::step::{NavigationStep, StepLog};

/// Placement decision for a forward move
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// The target was already visited in the current branch; move the
    /// pointer to the existing step, create nothing
    Revisit(NavigationStep),
    /// Continue the current branch with the next index
    Extend {
        branch_id: BranchId,
        step_index: u32,
        parent: StepId,
    },
    /// Start a new branch rooted at the current step
    Fork {
        branch_id: BranchId,
        step_index: u32,
        parent: StepId,
    },
}

impl Placement {
    /// Whether this placement discovers a new branch
    #[inline]
    #[must_use]
    pub fn is_fork(&self) -> bool {
        matches!(self, Placement::Fork { .. })
    }

    /// Whether this placement creates a new step row
    #[inline]
    #[must_use]
    pub fn creates_row(&self) -> bool {
        !matches!(self, Placement::Revisit(_))
    }
}

/// Decide where a forward move to `target` lands, standing on `current`
///
/// The caller must hold the map's write lock so that the revisit scan and
/// the subsequent row creation are effectively atomic; otherwise two
/// concurrent moves to the same (branch, node) pair could both miss each
/// other's in-flight row.
#[must_use]
pub fn resolve_placement(log: &StepLog, current: &NavigationStep, target: NodeId) -> Placement {
    if let Some(existing) = log.find_in_branch(current.map_id, current.branch_id, target) {
        return Placement::Revisit(existing);
    }

    let at_frontier = log
        .latest(current.map_id)
        .is_some_and(|latest| latest.id == current.id);

    if at_frontier {
        Placement::Extend {
            branch_id: current.branch_id,
            step_index: current.step_index + 1,
            parent: current.id,
        }
    } else {
        // The user navigated back earlier and is now moving forward into
        // new territory from a historical point.
        Placement::Fork {
            branch_id: BranchId::new(),
            step_index: 0,
            parent: current.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MapId;
    use crate::step::Direction;

    fn seeded_log() -> (StepLog, NavigationStep) {
        let log = StepLog::new();
        let root = log.append(NavigationStep::initial(MapId::new(), NodeId::new()));
        (log, root)
    }

    #[test]
    fn frontier_move_extends() {
        let (log, root) = seeded_log();

        let placement = resolve_placement(&log, &root, NodeId::new());
        assert_eq!(
            placement,
            Placement::Extend {
                branch_id: root.branch_id,
                step_index: 1,
                parent: root.id,
            }
        );
        assert!(placement.creates_row());
    }

    #[test]
    fn revisit_in_branch_creates_nothing() {
        let (log, root) = seeded_log();
        let node = NodeId::new();
        let second = log.append(NavigationStep::new(
            root.map_id,
            node,
            Direction::Deep,
            1,
            root.branch_id,
            Some(root.id),
        ));

        // Standing on the frontier, moving to an already-visited node.
        let placement = resolve_placement(&log, &second, root.node_id);
        assert_eq!(placement, Placement::Revisit(log.get(root.id).unwrap()));
        assert!(!placement.creates_row());

        // Revisit wins even when it would otherwise fork.
        let placement = resolve_placement(&log, &root, node);
        assert!(matches!(placement, Placement::Revisit(s) if s.id == second.id));
    }

    #[test]
    fn historical_move_forks() {
        let (log, root) = seeded_log();
        log.append(NavigationStep::new(
            root.map_id,
            NodeId::new(),
            Direction::Deep,
            1,
            root.branch_id,
            Some(root.id),
        ));

        // Root is no longer the map's latest step: a fresh branch starts.
        let placement = resolve_placement(&log, &root, NodeId::new());
        match placement {
            Placement::Fork {
                branch_id,
                step_index,
                parent,
            } => {
                assert_ne!(branch_id, root.branch_id);
                assert_eq!(step_index, 0);
                assert_eq!(parent, root.id);
            }
            other => panic!("expected fork, got {other:?}"),
        }
        assert!(placement.is_fork());
    }

    #[test]
    fn fork_decision_is_global_not_branch_local() {
        let (log, root) = seeded_log();
        let fork_step = log.append(NavigationStep::new(
            root.map_id,
            NodeId::new(),
            Direction::Similar,
            0,
            BranchId::new(),
            Some(root.id),
        ));

        // fork_step is the leaf of its own branch AND the map's latest
        // step, so continuing from it extends.
        let placement = resolve_placement(&log, &fork_step, NodeId::new());
        assert!(matches!(placement, Placement::Extend { .. }));

        // Append activity in another branch. fork_step is still a leaf of
        // its own branch, but no longer globally latest: it forks.
        log.append(NavigationStep::new(
            root.map_id,
            NodeId::new(),
            Direction::Deep,
            1,
            root.branch_id,
            Some(root.id),
        ));
        let placement = resolve_placement(&log, &fork_step, NodeId::new());
        assert!(placement.is_fork());
    }
}
