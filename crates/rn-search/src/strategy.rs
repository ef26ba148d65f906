//! The `PathSearch` trait and the built-in strategies.
//!
//! # Pluggability
//!
//! Callers reach every strategy through [`PathSearch`] and look them up by
//! name in an [`AlgorithmRegistry`](crate::AlgorithmRegistry), so a new
//! algorithm is added by implementing the trait and registering it.
//!
//! # Shared contract
//!
//! Every strategy:
//! - returns `None` when `goal` is unreachable from `start` (or either node
//!   is not in the graph),
//! - returns a one-node path of weight 0 when `start == goal`,
//! - never expands a node twice, so its work is bounded by the graph size.
//!
//! Heap entries are `(priority, NodeId)`, so equal priorities are broken by
//! the smaller node id and every strategy is deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rn_core::{Cost, NodeId};
use rn_network::SimplifiedGraph;

use crate::Path;

// ── PathSearch trait ──────────────────────────────────────────────────────────

/// One path-search algorithm over a [`SimplifiedGraph`].
///
/// Implementations must be `Send + Sync` so a registry can be shared by
/// every request thread.
pub trait PathSearch: Send + Sync {
    /// Display name, also the default registry key.
    fn name(&self) -> &'static str;

    /// Find a path from `start` to `goal`, or `None` if there is none.
    fn search(&self, graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Path>;
}

// ── DijkstraSearch ────────────────────────────────────────────────────────────

/// Textbook Dijkstra: a tentative-distance array with lazy deletion of
/// stale heap entries instead of an explicit closed set.
pub struct DijkstraSearch;

impl PathSearch for DijkstraSearch {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn search(&self, graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Path> {
        if let Some(early) = trivial(graph, start, goal) {
            return early;
        }

        let n = graph.node_count();
        // dist[v] = best known cost to reach v.
        let mut dist = vec![f64::INFINITY; n];
        // prev[v] = predecessor on the best known path; INVALID if unreached.
        let mut prev = vec![NodeId::INVALID; n];
        let mut expanded = 0usize;

        dist[start.index()] = 0.0;
        let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((Cost(0.0), start)));

        while let Some(Reverse((Cost(cost), node))) = heap.pop() {
            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }
            expanded += 1;

            if node == goal {
                log::debug!("Dijkstra {start}→{goal}: {expanded} nodes expanded");
                return Some(Path::from_nodes(graph, trace(&prev, goal), cost));
            }

            for edge in graph.out_edges(node) {
                let next = graph.edge_to[edge.index()];
                let new_cost = cost + graph.edge_weight[edge.index()];
                if new_cost < dist[next.index()] {
                    dist[next.index()] = new_cost;
                    prev[next.index()] = node;
                    heap.push(Reverse((Cost(new_cost), next)));
                }
            }
        }

        log::debug!("Dijkstra {start}→{goal}: no path after {expanded} nodes expanded");
        None
    }
}

// ── Best-first family ─────────────────────────────────────────────────────────

/// Uniform-cost search: best-first on accumulated cost, with an explicit
/// closed set of finalized nodes.
pub struct UniformCostSearch;

impl PathSearch for UniformCostSearch {
    fn name(&self) -> &'static str {
        "UCS"
    }

    fn search(&self, graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Path> {
        best_first(self.name(), graph, start, goal, |g, _| g)
    }
}

/// A*: best-first on cost plus [`SimplifiedGraph::heuristic`].
///
/// The heuristic is the great-circle distance to the goal scaled by the
/// graph's `heuristic_scale`, which never exceeds the weight-per-metre of any
/// edge.  It is therefore consistent, and A* returns the same optimum as the
/// uninformed strategies.
pub struct AStarSearch;

impl PathSearch for AStarSearch {
    fn name(&self) -> &'static str {
        "A Star"
    }

    fn search(&self, graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Path> {
        best_first(self.name(), graph, start, goal, |g, node| g + graph.heuristic(node, goal))
    }
}

/// Greedy best-first: expands the node geographically closest to the goal,
/// ignoring accumulated cost.  Fast, not optimal.
pub struct GreedyBestFirstSearch;

impl PathSearch for GreedyBestFirstSearch {
    fn name(&self) -> &'static str {
        "Greedy BFS"
    }

    fn search(&self, graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Path> {
        best_first(self.name(), graph, start, goal, |_, node| graph.distance_m(node, goal))
    }
}

/// Shared best-first loop.  `priority(g, node)` orders the frontier, where
/// `g` is the accumulated cost of the best known path to `node`.
///
/// A node is finalized when popped and never expanded again.  Predecessors
/// only point at finalized nodes, so `g[goal]` is always the weight of the
/// traced path even when the priority ignores cost.
fn best_first<F>(
    name:     &str,
    graph:    &SimplifiedGraph,
    start:    NodeId,
    goal:     NodeId,
    priority: F,
) -> Option<Path>
where
    F: Fn(f64, NodeId) -> f64,
{
    if let Some(early) = trivial(graph, start, goal) {
        return early;
    }

    let n = graph.node_count();
    let mut g = vec![f64::INFINITY; n];
    let mut prev = vec![NodeId::INVALID; n];
    let mut closed = vec![false; n];
    let mut expanded = 0usize;

    g[start.index()] = 0.0;
    let mut frontier: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    frontier.push(Reverse((Cost(priority(0.0, start)), start)));

    while let Some(Reverse((_, node))) = frontier.pop() {
        if closed[node.index()] {
            continue;
        }
        closed[node.index()] = true;
        expanded += 1;

        if node == goal {
            log::debug!("{name} {start}→{goal}: {expanded} nodes expanded");
            return Some(Path::from_nodes(graph, trace(&prev, goal), g[goal.index()]));
        }

        let cost = g[node.index()];
        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            if closed[next.index()] {
                continue;
            }
            let new_cost = cost + graph.edge_weight[edge.index()];
            if new_cost < g[next.index()] {
                g[next.index()] = new_cost;
                prev[next.index()] = node;
                frontier.push(Reverse((Cost(priority(new_cost, next)), next)));
            }
        }
    }

    log::debug!("{name} {start}→{goal}: no path after {expanded} nodes expanded");
    None
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Outcome for the cases every strategy short-circuits: `Some(None)` for an
/// unknown node, `Some(Some(trivial))` for `start == goal`.
fn trivial(graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Option<Path>> {
    if !graph.contains_node(start) || !graph.contains_node(goal) {
        return Some(None);
    }
    if start == goal {
        return Some(Some(Path::from_nodes(graph, vec![start], 0.0)));
    }
    None
}

/// Walk predecessors back from `goal` and return the nodes in travel order.
fn trace(prev: &[NodeId], goal: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![goal];
    let mut cur = goal;
    while prev[cur.index()] != NodeId::INVALID {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
