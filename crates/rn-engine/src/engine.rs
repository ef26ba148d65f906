//! The `Engine`: one lock over the network, its edit ledger, and the cached
//! search graph.
//!
//! # Consistency
//!
//! Every public method takes the lock for its whole duration, so a mutation
//! (including its undo record) is never observed half-applied and two
//! mutations never interleave.  Path searches rebuild the cached
//! [`SimplifiedGraph`] under the same lock whenever its `source_revision`
//! differs from the network's, so a stale graph is never searched.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rn_core::{CoreError, EngineConfig, FloodConfig, GeoPoint, NodeId, Polygon};
use rn_edit::{Direction, EditLedger, FloodParams, PendingRestores};
use rn_network::{NetworkError, RoadNetwork, SimplifiedGraph, shortest_path_by_weight};
use rn_search::AlgorithmRegistry;

use crate::{
    EngineError, EngineResult, Estimate, RouteResponse, SearchOutcome, Segment,
};

struct EngineState {
    network: RoadNetwork,
    ledger:  EditLedger,
    /// Last built search graph; stale once `network.revision()` moves on.
    graph:   Option<SimplifiedGraph>,
}

impl EngineState {
    /// The search graph for the current network, rebuilt if stale.
    fn search_graph(&mut self) -> &SimplifiedGraph {
        let revision = self.network.revision();
        if !matches!(&self.graph, Some(g) if g.source_revision == revision) {
            self.graph = None;
        }
        self.graph.get_or_insert_with(|| SimplifiedGraph::build(&self.network))
    }
}

/// Thread-safe façade over a [`RoadNetwork`].
///
/// `Engine` is `Send + Sync`; share it behind an `Arc` between request
/// handlers.
pub struct Engine {
    state:    Mutex<EngineState>,
    registry: AlgorithmRegistry,
    config:   EngineConfig,
}

impl Engine {
    /// Engine over `network` with the four built-in search strategies.
    pub fn new(network: RoadNetwork, config: EngineConfig) -> EngineResult<Self> {
        Self::with_registry(network, config, AlgorithmRegistry::with_defaults())
    }

    /// Engine with a caller-supplied strategy registry.
    pub fn with_registry(
        network:  RoadNetwork,
        config:   EngineConfig,
        registry: AlgorithmRegistry,
    ) -> EngineResult<Self> {
        config.validate()?;
        log::info!(
            "engine ready: {} nodes, {} edges, algorithms {:?}",
            network.node_count(),
            network.edge_count(),
            registry.names()
        );
        Ok(Self {
            state: Mutex::new(EngineState {
                network,
                ledger: EditLedger::new(config.restore_weight),
                graph: None,
            }),
            registry,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered algorithm names, alphabetically.
    pub fn algorithms(&self) -> Vec<&str> {
        self.registry.names()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            // Edits validate before mutating, so the state is still whole.
            log::warn!("engine lock was poisoned by a panicking thread; recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Run `f` against the network under the engine lock.
    pub fn with_network<R>(&self, f: impl FnOnce(&RoadNetwork) -> R) -> R {
        f(&self.lock().network)
    }

    pub fn revision(&self) -> u64 {
        self.lock().network.revision()
    }

    /// `true` if the cached search graph matches the current network.
    pub fn is_search_graph_fresh(&self) -> bool {
        let state = self.lock();
        state
            .graph
            .as_ref()
            .is_some_and(|g| g.source_revision == state.network.revision())
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Close the road `a`–`b`.  Returns the number of edges removed.
    pub fn ban_edge(&self, a: NodeId, b: NodeId, direction: Direction) -> EngineResult<usize> {
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.ban_edge(&mut state.network, a, b, direction)?)
    }

    pub fn unban_last(&self) -> EngineResult<usize> {
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.unban_last(&mut state.network)?)
    }

    /// Close every road touching a node inside `vertices`.
    pub fn ban_area(&self, vertices: Vec<GeoPoint>) -> EngineResult<usize> {
        let polygon = Polygon::new(vertices)?;
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.ban_area(&mut state.network, &polygon)?)
    }

    pub fn unban_last_area(&self) -> EngineResult<usize> {
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.unban_last_area(&mut state.network)?)
    }

    /// Multiply every parallel edge `a→b` by `factor`, or by the configured
    /// congestion factor when `None`.
    pub fn congest(&self, a: NodeId, b: NodeId, factor: Option<f64>) -> EngineResult<usize> {
        let factor = factor.unwrap_or(self.config.congestion_factor);
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.congest(&mut state.network, a, b, factor)?)
    }

    pub fn uncongest_last(&self) -> EngineResult<usize> {
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.uncongest_last(&mut state.network)?)
    }

    /// Flood `vertices` at `water_level` metres.  `thresholds` overrides the
    /// configured flood thresholds for this call only and is validated the
    /// same way.
    pub fn flood(
        &self,
        vertices:    Vec<GeoPoint>,
        water_level: f64,
        thresholds:  Option<FloodConfig>,
    ) -> EngineResult<usize> {
        let polygon = Polygon::new(vertices)?;
        if !water_level.is_finite() {
            return Err(CoreError::Config(format!("water level must be finite, got {water_level}")).into());
        }
        let thresholds = thresholds.unwrap_or(self.config.flood);
        thresholds.validate()?;
        let params = FloodParams::with_config(water_level, &thresholds);
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.flood(&mut state.network, &polygon, params)?)
    }

    pub fn unflood_last(&self) -> EngineResult<usize> {
        let mut guard = self.lock();
        let state = &mut *guard;
        Ok(state.ledger.unflood_last(&mut state.network)?)
    }

    pub fn pending_restores(&self) -> PendingRestores {
        self.lock().ledger.pending()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Search `start → goal` with the strategy registered as `algorithm`.
    ///
    /// An unreachable goal is `Ok` with [`SearchOutcome::NoPath`].
    /// `max_depth` is echoed back in the response and not enforced.
    pub fn find_path(
        &self,
        algorithm: &str,
        start:     NodeId,
        goal:      NodeId,
        max_depth: Option<usize>,
    ) -> EngineResult<RouteResponse> {
        let mut state = self.lock();
        let graph = state.search_graph();
        let outcome = match self.registry.search(algorithm, graph, start, goal)? {
            Some(path) => SearchOutcome::Found(path),
            None => SearchOutcome::NoPath,
        };
        Ok(RouteResponse {
            algorithm: algorithm.to_string(),
            start,
            goal,
            max_depth,
            outcome,
            start_connector: None,
            goal_connector: None,
        })
    }

    /// Snap both coordinates to their nearest nodes, search between them,
    /// and attach connector segments from/to the requested coordinates.
    pub fn route_between_points(
        &self,
        algorithm: &str,
        from:      GeoPoint,
        to:        GeoPoint,
        max_depth: Option<usize>,
    ) -> EngineResult<RouteResponse> {
        let (from, to) = (from.validated()?, to.validated()?);
        let (start, goal, start_pos, goal_pos) = {
            let state = self.lock();
            let snap = |p: GeoPoint| state.network.snap_to_node(p).ok_or(EngineError::EmptyNetwork);
            let (start, goal) = (snap(from)?, snap(to)?);
            let pos = |n: NodeId| state.network.node_pos(n).ok_or(NetworkError::NodeNotFound(n));
            (start, goal, pos(start)?, pos(goal)?)
        };

        let mut response = self.find_path(algorithm, start, goal, max_depth)?;
        response.start_connector = Some(Segment { from, to: start_pos });
        response.goal_connector = Some(Segment { from: goal_pos, to });
        Ok(response)
    }

    /// Lightest-path distance over the live multigraph and the time to
    /// cover it at `speed_mps` (configured default when `None`).
    ///
    /// Fails with `NoPathFound` when `goal` is unreachable.
    pub fn estimate(&self, start: NodeId, goal: NodeId, speed_mps: Option<f64>) -> EngineResult<Estimate> {
        let speed = speed_mps.unwrap_or(self.config.default_speed_mps);
        let state = self.lock();
        for node in [start, goal] {
            if !state.network.contains_node(node) {
                return Err(NetworkError::NodeNotFound(node).into());
            }
        }
        let path = shortest_path_by_weight(&state.network, start, goal)
            .ok_or(EngineError::NoPathFound { from: start, to: goal })?;
        let duration_s = (speed > 0.0).then(|| path.distance / speed);
        log::debug!("estimate {start}→{goal}: distance {}, duration {duration_s:?}", path.distance);
        Ok(Estimate { nodes: path.nodes, distance: path.distance, duration_s })
    }

    /// Nearest node to `pos`, or `None` for an empty network.  Fails with
    /// `InvalidCoordinate` if `pos` is not finite.
    pub fn snap(&self, pos: GeoPoint) -> EngineResult<Option<NodeId>> {
        let pos = pos.validated()?;
        Ok(self.lock().network.snap_to_node(pos))
    }

    /// Every node with its position, in id order.
    pub fn node_coords(&self) -> Vec<(NodeId, GeoPoint)> {
        let state = self.lock();
        state
            .network
            .nodes()
            .zip(state.network.node_positions().iter().copied())
            .collect()
    }

    /// One segment per connected ordered node pair, for drawing the network.
    pub fn edge_segments(&self) -> Vec<Segment> {
        let mut state = self.lock();
        let graph = state.search_graph();
        (0..graph.edge_count())
            .map(|e| Segment {
                from: graph.node_pos[graph.edge_from[e].index()],
                to:   graph.node_pos[graph.edge_to[e].index()],
            })
            .collect()
    }
}
