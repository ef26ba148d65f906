//! Weighted shortest path over the unsimplified multigraph.
//!
//! The distance/time estimate deliberately runs against the live
//! [`RoadNetwork`] rather than a [`SimplifiedGraph`](crate::SimplifiedGraph):
//! it must reflect the network even between search-graph rebuilds.  Each hop
//! uses the lightest parallel edge.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rn_core::{Cost, NodeId};

use crate::network::RoadNetwork;

/// Node sequence of a shortest path and its total weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPath {
    pub nodes:    Vec<NodeId>,
    pub distance: f64,
}

/// Standard Dijkstra from `from` to `to` on edge weight.
///
/// Returns `None` if either node is unknown or `to` is unreachable.
/// `from == to` yields a single-node path of distance 0.
pub fn shortest_path_by_weight(network: &RoadNetwork, from: NodeId, to: NodeId) -> Option<WeightedPath> {
    if !network.contains_node(from) || !network.contains_node(to) {
        return None;
    }
    if from == to {
        return Some(WeightedPath { nodes: vec![from], distance: 0.0 });
    }

    let n = network.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![NodeId::INVALID; n];
    dist[from.index()] = 0.0;

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            let mut nodes = vec![to];
            let mut cur = to;
            while prev[cur.index()] != NodeId::INVALID {
                cur = prev[cur.index()];
                nodes.push(cur);
            }
            nodes.reverse();
            return Some(WeightedPath { nodes, distance: cost });
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, weight) in network.out_neighbors_min(node) {
            let new_cost = cost + weight;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    None
}
