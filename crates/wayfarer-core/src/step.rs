//! The append-only navigation step log and the map pointer
//!
//! Steps form a forest: each step has at most one parent, a branch is the
//! maximal set of steps sharing a `branch_id`, and a step whose parent
//! lives in a different branch marks that branch's fork point. Steps are
//! immutable once appended and are never deleted; "going back" only moves
//! `MapRecord::current_step_id` to an ancestor.
//!
//! `seq` is a per-map creation counter assigned by `append` under the
//! per-map index guard, so the globally most-recently-created step of a
//! map is always the max-`seq` (equivalently, last-indexed) step.

use crate::error::CoreError;
use crate::ids::{BranchId, MapId, NodeId, StepId};
use crate::relation::RelationKind;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Direction of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Map bootstrap step
    Initial,
    /// Followed a Deep relation
    Deep,
    /// Followed a Related relation
    Related,
    /// Followed a Similar relation
    Similar,
}

impl Direction {
    /// The relationship kind this direction follows, if any
    #[inline]
    #[must_use]
    pub fn kind(self) -> Option<RelationKind> {
        match self {
            Direction::Initial => None,
            Direction::Deep => Some(RelationKind::Deep),
            Direction::Related => Some(RelationKind::Related),
            Direction::Similar => Some(RelationKind::Similar),
        }
    }
}

impl From<RelationKind> for Direction {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Deep => Direction::Deep,
            RelationKind::Related => Direction::Related,
            RelationKind::Similar => Direction::Similar,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Initial => "initial",
            Direction::Deep => "deep",
            Direction::Related => "related",
            Direction::Similar => "similar",
        };
        f.write_str(name)
    }
}

/// One entry in the append-only exploration log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStep {
    /// Step identifier
    pub id: StepId,
    /// Owning map
    pub map_id: MapId,
    /// Visited node
    pub node_id: NodeId,
    /// How the node was reached
    pub direction: Direction,
    /// Position within the branch, starting at 0
    pub step_index: u32,
    /// Owning branch
    pub branch_id: BranchId,
    /// Parent step; `None` only for a map's first step
    pub parent_step_id: Option<StepId>,
    /// Per-map creation counter, assigned on append
    pub seq: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl NavigationStep {
    /// Build a step record; `seq` is assigned by [`StepLog::append`]
    #[must_use]
    pub fn new(
        map_id: MapId,
        node_id: NodeId,
        direction: Direction,
        step_index: u32,
        branch_id: BranchId,
        parent_step_id: Option<StepId>,
    ) -> Self {
        Self {
            id: StepId::new(),
            map_id,
            node_id,
            direction,
            step_index,
            branch_id,
            parent_step_id,
            seq: 0,
            created_at: Utc::now(),
        }
    }

    /// Build a map's bootstrap step: index 0, fresh branch, no parent
    #[must_use]
    pub fn initial(map_id: MapId, node_id: NodeId) -> Self {
        Self::new(map_id, node_id, Direction::Initial, 0, BranchId::new(), None)
    }
}

/// Arena of immutable step records plus a per-map append-order index
#[derive(Debug, Default)]
pub struct StepLog {
    steps: DashMap<StepId, NavigationStep>,
    by_map: DashMap<MapId, Vec<StepId>>,
}

impl StepLog {
    /// Create an empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, assigning its `seq`, and return the stored record
    ///
    /// The arena entry is inserted before the index entry, so readers
    /// walking the index always find complete records.
    pub fn append(&self, mut step: NavigationStep) -> NavigationStep {
        let mut index = self.by_map.entry(step.map_id).or_default();
        step.seq = index.len() as u64;
        self.steps.insert(step.id, step.clone());
        index.push(step.id);
        step
    }

    /// Fetch a step by id
    #[must_use]
    pub fn get(&self, id: StepId) -> Option<NavigationStep> {
        self.steps.get(&id).map(|s| s.clone())
    }

    /// All steps of a map in creation order
    #[must_use]
    pub fn steps_for_map(&self, map_id: MapId) -> Vec<NavigationStep> {
        let Some(index) = self.by_map.get(&map_id) else {
            return Vec::new();
        };
        index.iter().filter_map(|id| self.get(*id)).collect()
    }

    /// The map's globally most-recently-created step, across all branches
    #[must_use]
    pub fn latest(&self, map_id: MapId) -> Option<NavigationStep> {
        let index = self.by_map.get(&map_id)?;
        let last = *index.last()?;
        self.get(last)
    }

    /// First step of `branch_id` in `map_id` that visited `node_id`
    ///
    /// This is the revisit scan: it must run, and its outcome be acted
    /// on, before a new row is created for the same (branch, node) pair.
    #[must_use]
    pub fn find_in_branch(
        &self,
        map_id: MapId,
        branch_id: BranchId,
        node_id: NodeId,
    ) -> Option<NavigationStep> {
        self.steps_for_map(map_id)
            .into_iter()
            .find(|s| s.branch_id == branch_id && s.node_id == node_id)
    }

    /// Number of distinct branches in a map
    #[must_use]
    pub fn branch_count(&self, map_id: MapId) -> usize {
        self.steps_for_map(map_id)
            .iter()
            .map(|s| s.branch_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of steps recorded for a map
    #[must_use]
    pub fn step_count(&self, map_id: MapId) -> usize {
        self.by_map.get(&map_id).map_or(0, |index| index.len())
    }
}

/// Mutable session state of one map: a pointer into the step forest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    /// Map identifier
    pub id: MapId,
    /// The step the user is currently standing on
    pub current_step_id: StepId,
}

/// Registry of map records
#[derive(Debug, Default)]
pub struct MapStore {
    maps: DashMap<MapId, MapRecord>,
}

impl MapStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a map
    pub fn create(&self, map: MapRecord) {
        self.maps.insert(map.id, map);
    }

    /// Fetch a map record
    #[must_use]
    pub fn get(&self, id: MapId) -> Option<MapRecord> {
        self.maps.get(&id).map(|m| *m)
    }

    /// Move the map pointer; this is the commit point of a navigation
    pub fn set_current_step(&self, id: MapId, step_id: StepId) -> Result<(), CoreError> {
        let mut map = self.maps.get_mut(&id).ok_or(CoreError::MapNotFound(id))?;
        map.current_step_id = step_id;
        Ok(())
    }

    /// Whether a map exists
    #[must_use]
    pub fn contains(&self, id: MapId) -> bool {
        self.maps.contains_key(&id)
    }
}
