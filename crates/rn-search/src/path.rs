//! Search results.

use rn_core::{GeoPoint, NodeId};
use rn_network::SimplifiedGraph;

/// A path found by a [`PathSearch`](crate::PathSearch) strategy.
///
/// `nodes` and `coords` are parallel: `coords[i]` is the position of
/// `nodes[i]`.  A trivial path (start = goal) has one node and weight 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes:        Vec<NodeId>,
    pub coords:       Vec<GeoPoint>,
    /// Sum of the simplified-graph weights along the path.
    pub total_weight: f64,
}

impl Path {
    /// Build a path from a node sequence, looking up positions in `graph`.
    pub(crate) fn from_nodes(graph: &SimplifiedGraph, nodes: Vec<NodeId>, total_weight: f64) -> Self {
        let coords = nodes.iter().map(|n| graph.node_pos[n.index()]).collect();
        Self { nodes, coords, total_weight }
    }

    /// `true` if the path never leaves its start node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// The path as `(lat, lon)` pairs, the shape map front-ends draw.
    pub fn lat_lon_pairs(&self) -> Vec<(f64, f64)> {
        self.coords.iter().map(|p| p.lat_lon()).collect()
    }
}
