//! Branch list projection
//!
//! A pure, recomputed-on-read view of a map's step forest: steps grouped
//! by branch, each branch annotated with where it forked off. Nothing
//! here is persisted and nothing is written.

use crate::ids::{BranchId, MapId};
use crate::node::NodeStore;
use crate::step::{NavigationStep, StepLog};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a branch's first step attaches to a pre-existing branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkPoint {
    /// Branch the fork departed from
    pub from_branch_id: BranchId,
    /// Title of the topic at the fork step
    pub at_step_title: String,
    /// Index of the fork step within its branch
    pub at_step_index: u32,
}

/// One branch of a map's exploration forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchView {
    /// Branch identifier
    pub branch_id: BranchId,
    /// Steps of the branch, ordered by step index
    pub steps: Vec<NavigationStep>,
    /// Fork descriptor; `None` for the map's root branch
    pub fork: Option<ForkPoint>,
}

/// Reconstruct the branch list of a map
///
/// Branches appear in order of first appearance in the log; steps within
/// a branch are ordered by `step_index`.
#[must_use]
pub fn branch_views(map_id: MapId, log: &StepLog, nodes: &NodeStore) -> Vec<BranchView> {
    let steps = log.steps_for_map(map_id);

    let mut order: Vec<BranchId> = Vec::new();
    let mut grouped: HashMap<BranchId, Vec<NavigationStep>> = HashMap::new();
    for step in steps {
        if !grouped.contains_key(&step.branch_id) {
            order.push(step.branch_id);
        }
        grouped.entry(step.branch_id).or_default().push(step);
    }

    order
        .into_iter()
        .map(|branch_id| {
            let mut branch_steps = grouped.remove(&branch_id).unwrap_or_default();
            branch_steps.sort_by_key(|s| s.step_index);
            let fork = fork_point(&branch_steps, log, nodes);
            BranchView {
                branch_id,
                steps: branch_steps,
                fork,
            }
        })
        .collect()
}

fn fork_point(
    branch_steps: &[NavigationStep],
    log: &StepLog,
    nodes: &NodeStore,
) -> Option<ForkPoint> {
    let first = branch_steps.first()?;
    let parent = log.get(first.parent_step_id?)?;
    if parent.branch_id == first.branch_id {
        return None;
    }
    let at_step_title = nodes
        .get(parent.node_id)
        .map(|n| n.title)
        .unwrap_or_default();
    Some(ForkPoint {
        from_branch_id: parent.branch_id,
        at_step_title,
        at_step_index: parent.step_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::NodeId;
    use crate::node::TopicNode;
    use crate::step::Direction;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_branch_has_no_fork() {
        let log = StepLog::new();
        let nodes = NodeStore::new();
        let map_id = MapId::new();
        let root = log.append(NavigationStep::initial(map_id, NodeId::new()));
        log.append(NavigationStep::new(
            map_id,
            NodeId::new(),
            Direction::Deep,
            1,
            root.branch_id,
            Some(root.id),
        ));

        let views = branch_views(map_id, &log, &nodes);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].branch_id, root.branch_id);
        assert_eq!(views[0].steps.len(), 2);
        assert!(views[0].fork.is_none());
    }

    #[test]
    fn forked_branch_reports_fork_point() {
        let log = StepLog::new();
        let nodes = NodeStore::new();
        let map_id = MapId::new();

        let root_node = TopicNode::new("Neural Networks", "Overview.");
        let root_node_id = nodes.insert(root_node);
        let root = log.append(NavigationStep::initial(map_id, root_node_id));
        log.append(NavigationStep::new(
            map_id,
            NodeId::new(),
            Direction::Deep,
            1,
            root.branch_id,
            Some(root.id),
        ));
        let forked = log.append(NavigationStep::new(
            map_id,
            NodeId::new(),
            Direction::Similar,
            0,
            BranchId::new(),
            Some(root.id),
        ));

        let views = branch_views(map_id, &log, &nodes);
        assert_eq!(views.len(), 2);

        // First-appearance order: root branch, then the fork.
        assert_eq!(views[0].branch_id, root.branch_id);
        assert_eq!(views[1].branch_id, forked.branch_id);

        let fork = views[1].fork.as_ref().unwrap();
        assert_eq!(fork.from_branch_id, root.branch_id);
        assert_eq!(fork.at_step_title, "Neural Networks");
        assert_eq!(fork.at_step_index, 0);
    }

    #[test]
    fn steps_ordered_by_index_within_branch() {
        let log = StepLog::new();
        let nodes = NodeStore::new();
        let map_id = MapId::new();
        let root = log.append(NavigationStep::initial(map_id, NodeId::new()));
        for i in 1..=3 {
            log.append(NavigationStep::new(
                map_id,
                NodeId::new(),
                Direction::Related,
                i,
                root.branch_id,
                Some(root.id),
            ));
        }

        let views = branch_views(map_id, &log, &nodes);
        let indexes: Vec<u32> = views[0].steps.iter().map(|s| s.step_index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_map_projects_empty_list() {
        let log = StepLog::new();
        let nodes = NodeStore::new();
        assert!(branch_views(MapId::new(), &log, &nodes).is_empty());
    }
}
