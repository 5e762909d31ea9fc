//! Property tests over the step forest
//!
//! Drives random forward / revisit / back sequences through the resolver
//! and the step log, persisting placements the way the session layer
//! does, and checks the forest invariants afterwards.

use proptest::prelude::*;
use std::collections::HashMap;
use wayfarer_core::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    /// Move forward to a never-seen node
    ForwardNew,
    /// Move forward to a node already visited in the current branch
    RevisitEarlier(usize),
    /// Step back to the parent, if any
    Back,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::ForwardNew),
        1 => any::<usize>().prop_map(Action::RevisitEarlier),
        2 => Just(Action::Back),
    ]
}

fn persist(log: &StepLog, map_id: MapId, target: NodeId, placement: Placement) -> NavigationStep {
    match placement {
        Placement::Revisit(existing) => existing,
        Placement::Extend {
            branch_id,
            step_index,
            parent,
        } => log.append(NavigationStep::new(
            map_id,
            target,
            Direction::Deep,
            step_index,
            branch_id,
            Some(parent),
        )),
        Placement::Fork {
            branch_id,
            step_index,
            parent,
        } => log.append(NavigationStep::new(
            map_id,
            target,
            Direction::Similar,
            step_index,
            branch_id,
            Some(parent),
        )),
    }
}

proptest! {
    #[test]
    fn forest_invariants_hold(actions in proptest::collection::vec(action_strategy(), 0..48)) {
        let log = StepLog::new();
        let map_id = MapId::new();
        let mut current = log.append(NavigationStep::initial(map_id, NodeId::new()));
        let mut rows_created = 1usize;

        for action in actions {
            match action {
                Action::ForwardNew => {
                    let target = NodeId::new();
                    let placement = resolve_placement(&log, &current, target);
                    match &placement {
                        Placement::Revisit(_) => {
                            prop_assert!(false, "fresh node resolved as revisit");
                        }
                        Placement::Extend { branch_id, step_index, parent } => {
                            prop_assert_eq!(*branch_id, current.branch_id);
                            prop_assert_eq!(*step_index, current.step_index + 1);
                            prop_assert_eq!(*parent, current.id);
                        }
                        Placement::Fork { branch_id, step_index, parent } => {
                            prop_assert_ne!(*branch_id, current.branch_id);
                            prop_assert_eq!(*step_index, 0);
                            prop_assert_eq!(*parent, current.id);
                        }
                    }
                    rows_created += 1;
                    current = persist(&log, map_id, target, placement);
                }
                Action::RevisitEarlier(pick) => {
                    let branch: Vec<NavigationStep> = log
                        .steps_for_map(map_id)
                        .into_iter()
                        .filter(|s| s.branch_id == current.branch_id)
                        .collect();
                    let target = branch[pick % branch.len()].node_id;
                    let placement = resolve_placement(&log, &current, target);
                    match placement {
                        Placement::Revisit(existing) => {
                            prop_assert_eq!(existing.branch_id, current.branch_id);
                            prop_assert_eq!(existing.node_id, target);
                            current = existing;
                        }
                        other => prop_assert!(false, "expected revisit, got {:?}", other),
                    }
                }
                Action::Back => {
                    if let Some(parent_id) = current.parent_step_id {
                        current = log.get(parent_id).unwrap();
                    }
                }
            }
        }

        // Row accounting: exactly one row per non-revisit forward, plus the root.
        prop_assert_eq!(log.step_count(map_id), rows_created);

        // Per-branch indexes are exactly 0,1,2,... in creation order.
        let mut by_branch: HashMap<BranchId, Vec<NavigationStep>> = HashMap::new();
        for step in log.steps_for_map(map_id) {
            by_branch.entry(step.branch_id).or_default().push(step);
        }
        for steps in by_branch.values() {
            for (i, step) in steps.iter().enumerate() {
                prop_assert_eq!(step.step_index as usize, i);
            }

            // A branch's first step either has no parent (the root branch)
            // or attaches to a step in a different branch (its fork point).
            let first = &steps[0];
            match first.parent_step_id {
                None => prop_assert_eq!(first.step_index, 0),
                Some(parent_id) => {
                    let parent = log.get(parent_id).unwrap();
                    prop_assert_ne!(parent.branch_id, first.branch_id);
                }
            }

            // Every later step chains to its predecessor in the branch.
            for pair in steps.windows(2) {
                prop_assert_eq!(pair[1].parent_step_id, Some(pair[0].id));
            }
        }
    }
}
