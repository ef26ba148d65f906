//! The simplified search graph.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_weight`) are sorted by
//! source node, then destination node, and indexed by `EdgeId`.  There is at
//! most one edge per ordered node pair, carrying the **minimum** weight of the
//! parallel edges it collapses.
//!
//! A `SimplifiedGraph` is a snapshot: it is never mutated, and it records the
//! [`RoadNetwork::revision`] it was built from so owners can tell when it has
//! gone stale.

use rn_core::{EdgeId, GeoPoint, NodeId};

use crate::network::RoadNetwork;

/// Relative slack applied to the heuristic scale so floating-point rounding
/// in the haversine never makes the heuristic overestimate.
const HEURISTIC_SLACK: f64 = 1.0 - 1e-9;

/// Directed simple graph in CSR format, derived from a [`RoadNetwork`].
///
/// All fields are `pub` for direct indexed access on hot paths.  Build with
/// [`SimplifiedGraph::build`].
#[derive(Clone, Debug)]
pub struct SimplifiedGraph {
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge.  Redundant with CSR but required for
    /// route reconstruction (trace a predecessor edge back to its source).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Minimum weight over the collapsed parallel edges.
    pub edge_weight: Vec<f64>,

    /// Lower bound on `weight / great-circle length` over every edge.
    /// Multiplying a great-circle distance by this never overestimates the
    /// remaining path weight.  `0.0` when no edge has a non-zero length.
    pub heuristic_scale: f64,

    /// Revision of the network this graph was built from.
    pub source_revision: u64,
}

impl SimplifiedGraph {
    /// Collapse parallel edges of `network` into a fresh search graph.
    ///
    /// Deterministic: the same network state always yields identical arrays.
    /// Time complexity: O(N + E) where E counts parallel edges.
    pub fn build(network: &RoadNetwork) -> Self {
        let node_count = network.node_count();
        let node_pos = network.node_positions().to_vec();

        let mut node_out_start = Vec::with_capacity(node_count + 1);
        let mut edge_from = Vec::new();
        let mut edge_to = Vec::new();
        let mut edge_weight = Vec::new();
        let mut min_ratio = f64::INFINITY;

        node_out_start.push(0u32);
        for from in network.nodes() {
            for (to, weight) in network.out_neighbors_min(from) {
                let length = node_pos[from.index()].distance_m(node_pos[to.index()]);
                if length > 0.0 {
                    min_ratio = min_ratio.min(weight / length);
                }
                edge_from.push(from);
                edge_to.push(to);
                edge_weight.push(weight);
            }
            node_out_start.push(edge_to.len() as u32);
        }

        let heuristic_scale = if min_ratio.is_finite() { min_ratio * HEURISTIC_SLACK } else { 0.0 };

        log::debug!(
            "simplified graph rebuilt: {} nodes, {} edges (from {} parallel edges, revision {})",
            node_count,
            edge_to.len(),
            network.edge_count(),
            network.revision(),
        );

        Self {
            node_pos,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            heuristic_scale,
            source_revision: network.revision(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The edge `from → to`, if one exists.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    /// Great-circle distance in metres between two nodes.
    #[inline]
    pub fn distance_m(&self, a: NodeId, b: NodeId) -> f64 {
        self.node_pos[a.index()].distance_m(self.node_pos[b.index()])
    }

    /// Admissible estimate of the remaining weight from `node` to `goal`.
    #[inline]
    pub fn heuristic(&self, node: NodeId, goal: NodeId) -> f64 {
        self.heuristic_scale * self.distance_m(node, goal)
    }
}
