//! Map session controller
//!
//! Top-level orchestration for exploration sessions: create a map, resume
//! it, navigate forward, navigate back, and project the branch list.
//!
//! # Concurrency
//!
//! Each map is a single-writer actor: every mutating operation holds the
//! map's async lock for the whole revisit-check, row-creation, and
//! pointer-advance sequence, so that sequence is effectively atomic.
//! Operations against different maps run fully in parallel. Reads go
//! straight to the lock-free stores; the pointer advance is the commit
//! point, and it only ever targets a fully-appended step.

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::generate::{ContentGenerator, ContextLookup};
use crate::neighbors::{NeighborGenerator, NeighborSet};
use crate::view::{ForwardOutcome, MapView};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use wayfarer_core::{
    branch_views, resolve_placement, BranchId, BranchView, CoreError, Direction, MapId, MapRecord,
    MapStore, NavigationStep, NodeId, NodeStore, Placement, RelationKind, StepId, StepLog,
    TopicNode,
};

/// The stores backing a session: arenas of immutable records plus the
/// per-map pointer registry
#[derive(Debug, Default)]
pub struct SessionStores {
    /// Topic nodes
    pub nodes: Arc<NodeStore>,
    /// Typed relations
    pub relations: Arc<wayfarer_core::RelationGraph>,
    /// Append-only step forest
    pub steps: Arc<StepLog>,
    /// Map pointers
    pub maps: Arc<MapStore>,
}

impl SessionStores {
    /// Create empty stores
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// The session controller
pub struct MapSession {
    stores: SessionStores,
    neighbors: NeighborGenerator,
    context: Arc<dyn ContextLookup>,
    locks: DashMap<MapId, Arc<Mutex<()>>>,
    config: SessionConfig,
}

impl MapSession {
    /// Create a session controller over fresh stores
    #[must_use]
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        context: Arc<dyn ContextLookup>,
        config: SessionConfig,
    ) -> Self {
        let stores = SessionStores::new();
        let neighbors = NeighborGenerator::new(
            generator,
            stores.nodes.clone(),
            stores.relations.clone(),
            config.clone(),
        );
        Self {
            stores,
            neighbors,
            context,
            locks: DashMap::new(),
            config,
        }
    }

    /// The stores backing this session
    #[inline]
    #[must_use]
    pub fn stores(&self) -> &SessionStores {
        &self.stores
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create a map from a user query
    ///
    /// Synthesizes the root topic and all three neighbor topics up front;
    /// any generation failure fails the whole call and nothing is
    /// persisted (all-or-nothing).
    pub async fn create_map(&self, query: &str) -> Result<MapView, SessionError> {
        let map_id = MapId::new();
        tracing::info!(%map_id, query, "creating map");

        let snippets = self.snippets(query).await;
        let root_topic = self
            .neighbors
            .seed(query, &snippets)
            .await
            .map_err(|source| {
                tracing::error!(%map_id, %source, "root topic generation failed");
                SessionError::generation(map_id, source)
            })?;
        let root = TopicNode::new(root_topic.label, root_topic.body);

        let expansions = self
            .neighbors
            .expand_required(&root.title, &root.body, &snippets, 0)
            .await
            .map_err(|source| {
                tracing::error!(%map_id, %source, "neighbor generation failed, discarding map");
                SessionError::generation(map_id, source)
            })?;

        // Every generation succeeded; persist the whole map at once.
        let root_id = self.stores.nodes.insert(root.clone());
        let mut neighbors = NeighborSet::default();
        for (kind, topic) in expansions {
            let node = TopicNode::generated(topic.label, topic.body);
            self.stores.nodes.insert(node.clone());
            self.stores.relations.try_link(root_id, kind, node.id);
            match kind {
                RelationKind::Deep => neighbors.deep = Some(node),
                RelationKind::Related => neighbors.related = Some(node),
                RelationKind::Similar => neighbors.similar = Some(node),
            }
        }

        let step = self
            .stores
            .steps
            .append(NavigationStep::initial(map_id, root_id));
        self.stores.maps.create(MapRecord {
            id: map_id,
            current_step_id: step.id,
        });

        tracing::info!(%map_id, step_id = %step.id, "map created");
        Ok(MapView::assemble(&step, root, neighbors))
    }

    /// Resume a map at its current step
    ///
    /// Read-only: loads the current step, its node, and whatever
    /// relationships already exist. Never triggers generation.
    pub async fn resume_map(&self, map_id: MapId) -> Result<MapView, SessionError> {
        let map = self
            .stores
            .maps
            .get(map_id)
            .ok_or(CoreError::MapNotFound(map_id))?;
        let step = self
            .stores
            .steps
            .get(map.current_step_id)
            .ok_or(CoreError::StepNotFound(map.current_step_id))?;
        let view = self.view_of(&step)?;
        tracing::debug!(%map_id, step_id = %step.id, "map resumed");
        Ok(view)
    }

    /// Navigate forward from the current step to a target node
    ///
    /// Placement is delegated to the branch resolver: a revisit moves the
    /// pointer to the existing step, otherwise a new row extends the
    /// current branch or forks a fresh one. The arrival node then gets
    /// its missing neighbors generated; per-slot failure leaves that
    /// neighbor `None` without failing the navigation.
    pub async fn navigate_forward(
        &self,
        map_id: MapId,
        current_step_id: StepId,
        current_branch_id: BranchId,
        target_node_id: NodeId,
        direction: Direction,
    ) -> Result<ForwardOutcome, SessionError> {
        if direction.kind().is_none() {
            return Err(CoreError::invariant(
                "forward navigation requires a relationship direction",
            )
            .into());
        }

        let lock = self.lock_for(map_id);
        let _guard = lock.lock().await;

        if !self.stores.maps.contains(map_id) {
            return Err(CoreError::MapNotFound(map_id).into());
        }
        let current = self
            .stores
            .steps
            .get(current_step_id)
            .ok_or(CoreError::StepNotFound(current_step_id))?;
        if current.map_id != map_id {
            return Err(CoreError::invariant(format!(
                "step {current_step_id} does not belong to map {map_id}"
            ))
            .into());
        }
        if current.branch_id != current_branch_id {
            return Err(CoreError::invariant(format!(
                "step {current_step_id} is not on branch {current_branch_id}"
            ))
            .into());
        }
        let target = self
            .stores
            .nodes
            .get(target_node_id)
            .ok_or(CoreError::NodeNotFound(target_node_id))?;

        let placement = resolve_placement(&self.stores.steps, &current, target_node_id);
        let (step, discovered_branch) = match placement {
            Placement::Revisit(existing) => {
                self.stores.maps.set_current_step(map_id, existing.id)?;
                tracing::debug!(%map_id, step_id = %existing.id, "revisit converged to existing step");
                (existing, None)
            }
            Placement::Extend {
                branch_id,
                step_index,
                parent,
            } => {
                let step = self.stores.steps.append(NavigationStep::new(
                    map_id,
                    target_node_id,
                    direction,
                    step_index,
                    branch_id,
                    Some(parent),
                ));
                self.stores.maps.set_current_step(map_id, step.id)?;
                (step, None)
            }
            Placement::Fork {
                branch_id,
                step_index,
                parent,
            } => {
                if self.stores.steps.branch_count(map_id) >= self.config.max_branches_per_map {
                    return Err(CoreError::invariant(format!(
                        "map {map_id} reached its branch limit ({})",
                        self.config.max_branches_per_map
                    ))
                    .into());
                }
                let step = self.stores.steps.append(NavigationStep::new(
                    map_id,
                    target_node_id,
                    direction,
                    step_index,
                    branch_id,
                    Some(parent),
                ));
                self.stores.maps.set_current_step(map_id, step.id)?;
                tracing::info!(%map_id, %branch_id, "new branch discovered");
                (step, Some(branch_id))
            }
        };

        let snippets = self.snippets(&target.title).await;
        let neighbors = self
            .neighbors
            .fill(&target, &snippets, step.step_index)
            .await;
        tracing::info!(
            %map_id,
            step_id = %step.id,
            filled = neighbors.filled(),
            "forward navigation complete"
        );

        Ok(ForwardOutcome {
            view: MapView::assemble(&step, target, neighbors),
            discovered_branch,
        })
    }

    /// Navigate back to the current step's parent
    ///
    /// Requires a parent step; fails with an invariant violation and an
    /// untouched pointer otherwise. Never triggers generation.
    pub async fn navigate_back(
        &self,
        current_step_id: StepId,
        current_branch_id: BranchId,
    ) -> Result<MapView, SessionError> {
        let step = self
            .stores
            .steps
            .get(current_step_id)
            .ok_or(CoreError::StepNotFound(current_step_id))?;

        let lock = self.lock_for(step.map_id);
        let _guard = lock.lock().await;

        if step.branch_id != current_branch_id {
            return Err(CoreError::invariant(format!(
                "step {current_step_id} is not on branch {current_branch_id}"
            ))
            .into());
        }
        let parent_id = step.parent_step_id.ok_or_else(|| {
            CoreError::invariant(format!(
                "step {current_step_id} has no parent to navigate back to"
            ))
        })?;
        let parent = self
            .stores
            .steps
            .get(parent_id)
            .ok_or(CoreError::StepNotFound(parent_id))?;

        let view = self.view_of(&parent)?;
        self.stores.maps.set_current_step(step.map_id, parent.id)?;
        tracing::info!(map_id = %step.map_id, from = %step.id, to = %parent.id, "navigated back");
        Ok(view)
    }

    /// Project the branch list of a map
    pub fn branches(&self, map_id: MapId) -> Result<Vec<BranchView>, SessionError> {
        if !self.stores.maps.contains(map_id) {
            return Err(CoreError::MapNotFound(map_id).into());
        }
        Ok(branch_views(
            map_id,
            &self.stores.steps,
            &self.stores.nodes,
        ))
    }

    fn view_of(&self, step: &NavigationStep) -> Result<MapView, SessionError> {
        let focus = self
            .stores
            .nodes
            .get(step.node_id)
            .ok_or(CoreError::NodeNotFound(step.node_id))?;
        let neighbors =
            NeighborSet::materialize(step.node_id, &self.stores.nodes, &self.stores.relations);
        Ok(MapView::assemble(step, focus, neighbors))
    }

    fn lock_for(&self, map_id: MapId) -> Arc<Mutex<()>> {
        self.locks
            .entry(map_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn snippets(&self, query: &str) -> Vec<String> {
        match self.context.lookup(query).await {
            Ok(mut snippets) => {
                snippets.truncate(self.config.max_snippets);
                snippets
            }
            Err(error) => {
                tracing::warn!(%error, query, "context lookup failed, continuing without snippets");
                Vec::new()
            }
        }
    }
}
