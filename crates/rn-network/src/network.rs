//! Editable road network and builder.
//!
//! # Data layout
//!
//! The network is a directed **multigraph**: any ordered node pair may be
//! joined by several parallel edges, told apart by an [`EdgeKey`].  Outgoing
//! edges are stored per source node as
//!
//! ```text
//! out[from] : BTreeMap<to, BTreeMap<EdgeKey, weight>>
//! ```
//!
//! Ordered maps keep every iteration (and therefore every derived
//! [`SimplifiedGraph`](crate::SimplifiedGraph) and search tie-break)
//! deterministic.  Empty inner maps are pruned, so "has an edge A→B" is a
//! single `contains_key`.
//!
//! Nodes are fixed once built; only edges are inserted, removed, or
//! re-weighted.  Every successful edge mutation bumps [`RoadNetwork::revision`],
//! which is how derived views detect that they are stale.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId` and
//! answers the bounding-box prefilter for polygon edits.

use std::collections::BTreeMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rn_core::{EdgeKey, GeoPoint, NodeId, Polygon};

use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── EdgeRef ───────────────────────────────────────────────────────────────────

/// A borrowed view of one parallel edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeRef {
    pub from:   NodeId,
    pub to:     NodeId,
    pub key:    EdgeKey,
    pub weight: f64,
}

type Parallel = BTreeMap<EdgeKey, f64>;

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph plus a spatial index for node snapping.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Geographic position of each node.  Indexed by `NodeId`.
    node_pos: Vec<GeoPoint>,

    /// Outgoing adjacency.  Indexed by source `NodeId`.
    out: Vec<BTreeMap<NodeId, Parallel>>,

    edge_count: usize,

    /// Incremented by every successful edge mutation.
    revision: u64,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        Self::from_nodes(Vec::new())
    }

    fn from_nodes(node_pos: Vec<GeoPoint>) -> Self {
        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();

        Self {
            out: vec![BTreeMap::new(); node_pos.len()],
            node_pos,
            edge_count: 0,
            revision: 0,
            spatial_idx: RTree::bulk_load(entries),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Total number of edges, counting every parallel edge.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Monotonic mutation counter.  Two reads returning the same value saw
    /// the same edge set and weights.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    pub fn node_pos(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied()
    }

    /// Positions of all nodes, indexed by `NodeId`.
    pub fn node_positions(&self) -> &[GeoPoint] {
        &self.node_pos
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_pos.len()).map(|i| NodeId(i as u32))
    }

    /// All nodes whose position lies inside `polygon`, in ascending id order.
    ///
    /// The R-tree narrows candidates to the polygon's bounding box before the
    /// exact point-in-polygon test.
    pub fn nodes_within(&self, polygon: &Polygon) -> Vec<NodeId> {
        let (sw, ne) = polygon.bounding_box();
        let bbox = AABB::from_corners([sw.lat, sw.lon], [ne.lat, ne.lon]);
        let mut inside: Vec<NodeId> = self
            .spatial_idx
            .locate_in_envelope(&bbox)
            .filter(|e| polygon.contains(self.node_pos[e.id.index()]))
            .map(|e| e.id)
            .collect();
        inside.sort_unstable();
        inside
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    /// `true` if at least one edge `from → to` exists.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.out
            .get(from.index())
            .is_some_and(|adj| adj.contains_key(&to))
    }

    pub fn edge_weight(&self, from: NodeId, to: NodeId, key: EdgeKey) -> Option<f64> {
        self.out
            .get(from.index())?
            .get(&to)?
            .get(&key)
            .copied()
    }

    /// Parallel edges `from → to` as `(key, weight)`, in key order.
    pub fn parallel_edges(&self, from: NodeId, to: NodeId) -> Vec<(EdgeKey, f64)> {
        self.out
            .get(from.index())
            .and_then(|adj| adj.get(&to))
            .map(|p| p.iter().map(|(&k, &w)| (k, w)).collect())
            .unwrap_or_default()
    }

    /// Every outgoing parallel edge of `from`, grouped by destination.
    pub fn out_edges(&self, from: NodeId) -> impl Iterator<Item = EdgeRef> + '_ {
        self.out
            .get(from.index())
            .into_iter()
            .flat_map(move |adj| {
                adj.iter().flat_map(move |(&to, parallel)| {
                    parallel
                        .iter()
                        .map(move |(&key, &weight)| EdgeRef { from, to, key, weight })
                })
            })
    }

    /// Lightest parallel edge to each out-neighbour of `from`.
    pub fn out_neighbors_min(&self, from: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.out
            .get(from.index())
            .into_iter()
            .flat_map(|adj| {
                adj.iter().filter_map(|(&to, parallel)| {
                    parallel.values().copied().reduce(f64::min).map(|w| (to, w))
                })
            })
    }

    /// Every edge in the network, ordered by `(from, to, key)`.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.nodes().flat_map(move |n| self.out_edges(n))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert a new parallel edge `from → to` and return the key it received.
    ///
    /// The key is the smallest unused value ≥ the current parallel count.
    pub fn insert_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> NetworkResult<EdgeKey> {
        self.check_edge(from, to, weight)?;
        let parallel = self.out[from.index()].entry(to).or_default();
        let mut key = EdgeKey(parallel.len() as u32);
        while parallel.contains_key(&key) {
            key = EdgeKey(key.0 + 1);
        }
        parallel.insert(key, weight);
        self.edge_count += 1;
        self.revision += 1;
        Ok(key)
    }

    /// Insert `from → to` under an explicit `key`, overwriting the weight of
    /// an edge already holding that key.  Returns the overwritten weight.
    pub fn insert_edge_with_key(
        &mut self,
        from:   NodeId,
        to:     NodeId,
        key:    EdgeKey,
        weight: f64,
    ) -> NetworkResult<Option<f64>> {
        self.check_edge(from, to, weight)?;
        let previous = self.out[from.index()].entry(to).or_default().insert(key, weight);
        if previous.is_none() {
            self.edge_count += 1;
        }
        self.revision += 1;
        Ok(previous)
    }

    /// Remove a single parallel edge.  Returns its weight if it existed.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId, key: EdgeKey) -> Option<f64> {
        let adj = self.out.get_mut(from.index())?;
        let parallel = adj.get_mut(&to)?;
        let weight = parallel.remove(&key)?;
        if parallel.is_empty() {
            adj.remove(&to);
        }
        self.edge_count -= 1;
        self.revision += 1;
        Some(weight)
    }

    /// Remove every parallel edge `from → to`, returning them in key order.
    pub fn remove_parallel_edges(&mut self, from: NodeId, to: NodeId) -> Vec<(EdgeKey, f64)> {
        let Some(parallel) = self.out.get_mut(from.index()).and_then(|adj| adj.remove(&to)) else {
            return Vec::new();
        };
        self.edge_count -= parallel.len();
        self.revision += 1;
        parallel.into_iter().collect()
    }

    /// Overwrite the weight of an existing edge and return the old weight.
    ///
    /// Returns `Ok(None)` (and changes nothing) if the edge does not exist.
    pub fn set_weight(
        &mut self,
        from:   NodeId,
        to:     NodeId,
        key:    EdgeKey,
        weight: f64,
    ) -> NetworkResult<Option<f64>> {
        check_weight(from, to, weight)?;
        let slot = self
            .out
            .get_mut(from.index())
            .and_then(|adj| adj.get_mut(&to))
            .and_then(|p| p.get_mut(&key));
        let Some(slot) = slot else {
            return Ok(None);
        };
        let old = std::mem::replace(slot, weight);
        self.revision += 1;
        Ok(Some(old))
    }

    fn check_edge(&self, from: NodeId, to: NodeId, weight: f64) -> NetworkResult<()> {
        for n in [from, to] {
            if !self.contains_node(n) {
                return Err(NetworkError::NodeNotFound(n));
            }
        }
        check_weight(from, to, weight)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` if the network has no nodes or `pos` is not finite.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        if !pos.is_finite() {
            return Vec::new();
        }
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

fn check_weight(from: NodeId, to: NodeId, weight: f64) -> NetworkResult<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidWeight { from, to, weight })
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rn_core::GeoPoint;
/// use rn_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(21.034, 105.834));
/// let c = b.add_node(GeoPoint::new(21.036, 105.838));
/// b.add_road(a, c, 460.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    key:    Option<EdgeKey>,
    weight: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to`; the key is assigned at
    /// build time.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.raw_edges.push(RawEdge { from, to, key: None, weight });
    }

    /// Add a directed edge under a key taken from the source data.  A later
    /// edge with the same `(from, to, key)` replaces an earlier one.
    pub fn add_keyed_edge(&mut self, from: NodeId, to: NodeId, key: EdgeKey, weight: f64) {
        self.raw_edges.push(RawEdge { from, to, key: Some(key), weight });
    }

    /// Convenience: add edges in **both directions** for a two-way road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_directed_edge(a, b, weight);
        self.add_directed_edge(b, a, weight);
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Fails if an edge references a node that was never added or carries a
    /// non-positive weight.  Keyed edges are placed first so unkeyed ones
    /// never steal a key the source data asked for.
    pub fn build(self) -> NetworkResult<RoadNetwork> {
        // The R-tree bulk load cannot order NaN or infinite points.
        if let Some((i, p)) = self.nodes.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(NetworkError::InvalidPosition { node: NodeId(i as u32), lat: p.lat, lon: p.lon });
        }
        let mut net = RoadNetwork::from_nodes(self.nodes);

        // Stable sort: keyed edges first, each group in insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.key.is_none());

        for e in raw {
            match e.key {
                Some(key) => {
                    net.insert_edge_with_key(e.from, e.to, key, e.weight)?;
                }
                None => {
                    net.insert_edge(e.from, e.to, e.weight)?;
                }
            }
        }

        net.revision = 0;
        Ok(net)
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
