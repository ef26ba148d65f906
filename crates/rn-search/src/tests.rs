//! Unit tests for rn-search.

#[cfg(test)]
mod helpers {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rn_core::{GeoPoint, NodeId};
    use rn_network::{RoadNetwork, RoadNetworkBuilder, SimplifiedGraph};

    /// A:(0,0)  B:(0,1)  C:(1,1); A→B 1, B→C 1, A→C 5.
    pub fn triangle() -> (RoadNetwork, [NodeId; 3]) {
        let mut bld = RoadNetworkBuilder::new();
        let a = bld.add_node(GeoPoint::new(0.0, 0.0));
        let b = bld.add_node(GeoPoint::new(0.0, 1.0));
        let c = bld.add_node(GeoPoint::new(1.0, 1.0));
        bld.add_directed_edge(a, b, 1.0);
        bld.add_directed_edge(b, c, 1.0);
        bld.add_directed_edge(a, c, 5.0);
        (bld.build().unwrap(), [a, b, c])
    }

    /// Two components: {A, B} and {C, D}, each a two-way road.
    pub fn two_islands() -> (SimplifiedGraph, [NodeId; 4]) {
        let mut bld = RoadNetworkBuilder::new();
        let a = bld.add_node(GeoPoint::new(21.030, 105.830));
        let b = bld.add_node(GeoPoint::new(21.031, 105.830));
        let c = bld.add_node(GeoPoint::new(21.040, 105.840));
        let d = bld.add_node(GeoPoint::new(21.041, 105.840));
        bld.add_road(a, b, 110.0);
        bld.add_road(c, d, 110.0);
        (SimplifiedGraph::build(&bld.build().unwrap()), [a, b, c, d])
    }

    /// Random sparse digraph around Ba Đình with weights unrelated to
    /// geometry, plus a Hamiltonian cycle so most pairs are connected.
    pub fn random_graph(seed: u64, nodes: usize, extra_edges: usize) -> SimplifiedGraph {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut bld = RoadNetworkBuilder::new();
        let ids: Vec<NodeId> = (0..nodes)
            .map(|_| {
                bld.add_node(GeoPoint::new(
                    21.02 + rng.gen_range(0.0..0.03),
                    105.82 + rng.gen_range(0.0..0.03),
                ))
            })
            .collect();
        for i in 0..nodes {
            let w = rng.gen_range(1.0..500.0);
            bld.add_directed_edge(ids[i], ids[(i + 1) % nodes], w);
        }
        for _ in 0..extra_edges {
            let from = ids[rng.gen_range(0..nodes)];
            let to = ids[rng.gen_range(0..nodes)];
            if from != to {
                bld.add_directed_edge(from, to, rng.gen_range(1.0..500.0));
            }
        }
        SimplifiedGraph::build(&bld.build().unwrap())
    }

    /// Sum of simplified-graph weights along `nodes`; panics on a missing hop.
    pub fn path_weight(graph: &SimplifiedGraph, nodes: &[NodeId]) -> f64 {
        nodes
            .windows(2)
            .map(|w| {
                let e = graph.find_edge(w[0], w[1]).expect("path uses a missing edge");
                graph.edge_weight[e.index()]
            })
            .sum()
    }
}

// ── Individual strategies ─────────────────────────────────────────────────────

#[cfg(test)]
mod strategies {
    use rn_core::EdgeKey;
    use rn_network::SimplifiedGraph;

    use crate::{AStarSearch, DijkstraSearch, GreedyBestFirstSearch, PathSearch, UniformCostSearch};

    fn optimal() -> [Box<dyn PathSearch>; 3] {
        [Box::new(DijkstraSearch), Box::new(UniformCostSearch), Box::new(AStarSearch)]
    }

    #[test]
    fn cheaper_detour_beats_direct_edge() {
        let (net, [a, b, c]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        for s in optimal() {
            let path = s.search(&graph, a, c).unwrap();
            assert_eq!(path.nodes, vec![a, b, c], "{}", s.name());
            assert!((path.total_weight - 2.0).abs() < 1e-12, "{}", s.name());
        }
    }

    #[test]
    fn congested_detour_switches_to_direct_edge() {
        let (mut net, [a, b, c]) = super::helpers::triangle();
        assert_eq!(net.set_weight(a, b, EdgeKey(0), 5.0).unwrap(), Some(1.0));
        let graph = SimplifiedGraph::build(&net);
        for s in optimal() {
            let path = s.search(&graph, a, c).unwrap();
            assert_eq!(path.nodes, vec![a, c], "{}", s.name());
            assert!((path.total_weight - 5.0).abs() < 1e-12, "{}", s.name());
        }
    }

    #[test]
    fn greedy_follows_geometry_not_cost() {
        let (net, [a, _, c]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        let path = GreedyBestFirstSearch.search(&graph, a, c).unwrap();
        // C itself is the closest neighbour of A to C.
        assert_eq!(path.nodes, vec![a, c]);
        assert!((path.total_weight - 5.0).abs() < 1e-12);
    }

    #[test]
    fn start_equals_goal_is_trivial() {
        let (net, [a, ..]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        let all: [Box<dyn PathSearch>; 4] = [
            Box::new(DijkstraSearch),
            Box::new(UniformCostSearch),
            Box::new(AStarSearch),
            Box::new(GreedyBestFirstSearch),
        ];
        for s in all {
            let path = s.search(&graph, a, a).unwrap();
            assert!(path.is_trivial(), "{}", s.name());
            assert_eq!(path.nodes, vec![a]);
            assert_eq!(path.total_weight, 0.0);
            assert_eq!(path.hop_count(), 0);
        }
    }

    #[test]
    fn disconnected_components_yield_none() {
        let (graph, [a, b, c, d]) = super::helpers::two_islands();
        let all: [Box<dyn PathSearch>; 4] = [
            Box::new(DijkstraSearch),
            Box::new(UniformCostSearch),
            Box::new(AStarSearch),
            Box::new(GreedyBestFirstSearch),
        ];
        for s in all {
            assert!(s.search(&graph, a, c).is_none(), "{}", s.name());
            assert!(s.search(&graph, d, b).is_none(), "{}", s.name());
            assert!(s.search(&graph, a, b).is_some(), "{}", s.name());
        }
    }

    #[test]
    fn directed_edges_are_one_way() {
        let (net, [a, _, c]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        assert!(DijkstraSearch.search(&graph, c, a).is_none());
        assert!(AStarSearch.search(&graph, c, a).is_none());
    }

    #[test]
    fn coordinates_follow_nodes() {
        let (net, [a, b, c]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        let path = UniformCostSearch.search(&graph, a, c).unwrap();
        assert_eq!(path.lat_lon_pairs(), vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(path.coords[1], graph.node_pos[b.index()]);
    }

    #[test]
    fn parallel_edges_search_on_minimum() {
        let (mut net, [a, b, c]) = super::helpers::triangle();
        net.insert_edge(a, b, 0.25).unwrap();
        let graph = SimplifiedGraph::build(&net);
        let path = DijkstraSearch.search(&graph, a, c).unwrap();
        assert!((path.total_weight - 1.25).abs() < 1e-12);
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use rn_core::{GeoPoint, NodeId};
    use rn_network::SimplifiedGraph;

    use crate::{AlgorithmRegistry, Path, PathSearch, SearchError};

    #[test]
    fn defaults_register_four_strategies() {
        let reg = AlgorithmRegistry::with_defaults();
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.names(), vec!["A Star", "Dijkstra", "Greedy BFS", "UCS"]);
        assert!(reg.contains("UCS"));
        assert!(!reg.contains("ucs"));
    }

    #[test]
    fn unknown_name_is_invalid_algorithm() {
        let (net, [a, _, c]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        let reg = AlgorithmRegistry::with_defaults();
        assert_eq!(
            reg.search("Bellman-Ford", &graph, a, c),
            Err(SearchError::InvalidAlgorithm("Bellman-Ford".into()))
        );
    }

    #[test]
    fn unknown_node_is_rejected() {
        let (net, [a, ..]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        let reg = AlgorithmRegistry::with_defaults();
        assert_eq!(
            reg.search("Dijkstra", &graph, a, NodeId(99)),
            Err(SearchError::NodeNotFound(NodeId(99)))
        );
    }

    #[test]
    fn no_path_is_ok_none() {
        let (graph, [a, _, c, _]) = super::helpers::two_islands();
        let reg = AlgorithmRegistry::with_defaults();
        for name in reg.names() {
            assert_eq!(reg.search(name, &graph, a, c), Ok(None), "{name}");
        }
    }

    /// Always answers with a straight hop, whether or not the edge exists.
    struct AsTheCrowFlies;

    impl PathSearch for AsTheCrowFlies {
        fn name(&self) -> &'static str {
            "Crow"
        }

        fn search(&self, graph: &SimplifiedGraph, start: NodeId, goal: NodeId) -> Option<Path> {
            Some(Path {
                nodes:        vec![start, goal],
                coords:       vec![graph.node_pos[start.index()], graph.node_pos[goal.index()]],
                total_weight: graph.distance_m(start, goal),
            })
        }
    }

    #[test]
    fn custom_strategy_can_be_registered() {
        let (net, [a, _, c]) = super::helpers::triangle();
        let graph = SimplifiedGraph::build(&net);
        let mut reg = AlgorithmRegistry::new();
        assert!(reg.is_empty());
        reg.register(AsTheCrowFlies);
        reg.register_as("Bird", Box::new(AsTheCrowFlies));

        let path = reg.search("Crow", &graph, a, c).unwrap().unwrap();
        assert_eq!(path.nodes, vec![a, c]);
        assert_eq!(path.coords[1], GeoPoint::new(1.0, 1.0));
        assert!(reg.search("Bird", &graph, a, c).unwrap().is_some());
        assert!(reg.search("Dijkstra", &graph, a, c).is_err());
    }
}

// ── Randomised optimality relations ───────────────────────────────────────────

#[cfg(test)]
mod properties {
    use rn_core::NodeId;

    use crate::{AStarSearch, DijkstraSearch, GreedyBestFirstSearch, PathSearch, UniformCostSearch};

    use super::helpers::{path_weight, random_graph};

    const EPS: f64 = 1e-9;

    #[test]
    fn optimal_strategies_agree_and_greedy_is_never_better() {
        for seed in 0..20u64 {
            let graph = random_graph(seed, 40, 80);
            for (s, g) in [(0u32, 17u32), (3, 29), (11, 5), (38, 1), (20, 21)] {
                let (start, goal) = (NodeId(s), NodeId(g));
                let dijkstra = DijkstraSearch.search(&graph, start, goal);
                let ucs = UniformCostSearch.search(&graph, start, goal);
                let astar = AStarSearch.search(&graph, start, goal);
                let greedy = GreedyBestFirstSearch.search(&graph, start, goal);

                // The Hamiltonian cycle connects every ordered pair.
                let best = dijkstra.expect("cycle guarantees a path").total_weight;
                let ucs = ucs.expect("ucs must find the path");
                let astar = astar.expect("A* must find the path");
                let greedy = greedy.expect("greedy must find a path");

                let tol = EPS * best.max(1.0);
                assert!((ucs.total_weight - best).abs() <= tol, "seed {seed}: UCS");
                assert!((astar.total_weight - best).abs() <= tol, "seed {seed}: A*");
                assert!(greedy.total_weight + tol >= best, "seed {seed}: greedy");

                for p in [&ucs, &astar, &greedy] {
                    assert_eq!(p.nodes.first(), Some(&start));
                    assert_eq!(p.nodes.last(), Some(&goal));
                    let w = path_weight(&graph, &p.nodes);
                    assert!((w - p.total_weight).abs() <= tol, "seed {seed}: reported weight");
                }
            }
        }
    }

    #[test]
    fn heuristic_never_overestimates() {
        for seed in 100..110u64 {
            let graph = random_graph(seed, 30, 60);
            let goal = NodeId(7);
            for n in 0..graph.node_count() as u32 {
                let node = NodeId(n);
                if let Some(p) = DijkstraSearch.search(&graph, node, goal) {
                    assert!(graph.heuristic(node, goal) <= p.total_weight + EPS);
                }
            }
        }
    }

    #[test]
    fn strategies_are_deterministic() {
        let graph = random_graph(42, 50, 120);
        let all: [Box<dyn PathSearch>; 4] = [
            Box::new(DijkstraSearch),
            Box::new(UniformCostSearch),
            Box::new(AStarSearch),
            Box::new(GreedyBestFirstSearch),
        ];
        for s in all {
            let first = s.search(&graph, NodeId(1), NodeId(33));
            let second = s.search(&graph, NodeId(1), NodeId(33));
            assert_eq!(first, second, "{}", s.name());
        }
    }
}
