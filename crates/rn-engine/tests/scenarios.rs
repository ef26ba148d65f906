//! End-to-end scenarios through the public `Engine` API.

use std::sync::Arc;
use std::thread;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rn_core::{EdgeKey, EngineConfig, GeoPoint, NodeId, point_in_polygon};
use rn_edit::Direction;
use rn_engine::{Engine, SearchOutcome};
use rn_network::{RoadNetwork, RoadNetworkBuilder, load_network_reader};

/// A:(0,0)  B:(0,1)  C:(1,1); A→B 1, B→C 1, A→C 5.
fn triangle() -> (Engine, [NodeId; 3]) {
    let mut bld = RoadNetworkBuilder::new();
    let a = bld.add_node(GeoPoint::new(0.0, 0.0));
    let b = bld.add_node(GeoPoint::new(0.0, 1.0));
    let c = bld.add_node(GeoPoint::new(1.0, 1.0));
    bld.add_directed_edge(a, b, 1.0);
    bld.add_directed_edge(b, c, 1.0);
    bld.add_directed_edge(a, c, 5.0);
    (Engine::new(bld.build().unwrap(), EngineConfig::default()).unwrap(), [a, b, c])
}

/// `n × n` grid of two-way streets, 0.001° apart, with random weights.
fn grid(n: usize, seed: u64) -> (RoadNetwork, Vec<NodeId>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut bld = RoadNetworkBuilder::new();
    let ids: Vec<NodeId> = (0..n * n)
        .map(|i| bld.add_node(GeoPoint::new(21.03 + (i / n) as f64 * 0.001, 105.83 + (i % n) as f64 * 0.001)))
        .collect();
    for r in 0..n {
        for c in 0..n {
            let here = ids[r * n + c];
            if c + 1 < n {
                bld.add_road(here, ids[r * n + c + 1], rng.gen_range(80.0..200.0));
            }
            if r + 1 < n {
                bld.add_road(here, ids[(r + 1) * n + c], rng.gen_range(80.0..200.0));
            }
        }
    }
    (bld.build().unwrap(), ids)
}

fn weights(engine: &Engine) -> Vec<(NodeId, NodeId, EdgeKey, f64)> {
    engine.with_network(|net| net.edges().map(|e| (e.from, e.to, e.key, e.weight)).collect())
}

#[test]
fn detour_then_congestion() {
    let (engine, [a, b, c]) = triangle();
    for name in ["Dijkstra", "UCS", "A Star"] {
        let route = engine.find_path(name, a, c, None).unwrap();
        let path = route.path().unwrap();
        assert_eq!(path.nodes, vec![a, b, c], "{name}");
        assert!((path.total_weight - 2.0).abs() < 1e-12);
    }

    engine.congest(a, b, Some(5.0)).unwrap();
    for name in ["Dijkstra", "UCS", "A Star"] {
        let route = engine.find_path(name, a, c, None).unwrap();
        let path = route.path().unwrap();
        assert_eq!(path.nodes, vec![a, c], "{name}");
        assert!((path.total_weight - 5.0).abs() < 1e-12);
    }

    engine.uncongest_last().unwrap();
    let route = engine.find_path("Dijkstra", a, c, None).unwrap();
    assert_eq!(route.path().unwrap().nodes, vec![a, b, c]);
}

#[test]
fn trivial_route_is_not_no_path() {
    let (engine, [a, ..]) = triangle();
    for name in engine.algorithms() {
        let route = engine.find_path(name, a, a, None).unwrap();
        let path = route.path().unwrap();
        assert!(path.is_trivial(), "{name}");
        assert_eq!(path.total_weight, 0.0);
    }
}

#[test]
fn ban_restore_reconnects_with_default_weight() {
    let (engine, [a, b, c]) = triangle();
    engine.ban_edge(a, b, Direction::Both).unwrap();
    engine.with_network(|net| assert!(!net.has_edge(a, b)));
    assert_eq!(engine.find_path("UCS", a, c, None).unwrap().path().unwrap().nodes, vec![a, c]);

    engine.unban_last().unwrap();
    engine.with_network(|net| {
        assert!(net.has_edge(a, b));
        assert!(!net.has_edge(b, a));
        assert_eq!(net.parallel_edges(a, b), vec![(EdgeKey(0), EngineConfig::default().restore_weight)]);
    });
}

#[test]
fn empty_restores_change_nothing() {
    let (engine, _) = triangle();
    let before = weights(&engine);
    let revision = engine.revision();
    for result in [
        engine.unban_last(),
        engine.unban_last_area(),
        engine.uncongest_last(),
        engine.unflood_last(),
    ] {
        assert_eq!(result.unwrap_err().kind(), "nothing_to_restore");
    }
    assert_eq!(weights(&engine), before);
    assert_eq!(engine.revision(), revision);
}

#[test]
fn area_ban_outside_network_succeeds_with_zero() {
    let (engine, _) = triangle();
    let far = vec![
        GeoPoint::new(40.0, 40.0),
        GeoPoint::new(40.0, 41.0),
        GeoPoint::new(41.0, 41.0),
    ];
    assert_eq!(engine.ban_area(far).unwrap(), 0);
    assert_eq!(engine.pending_restores().area_bans, 1);
    assert_eq!(engine.unban_last_area().unwrap(), 0);
}

#[test]
fn flood_and_restore_on_a_district_grid() {
    let (network, ids) = grid(6, 7);
    let engine = Engine::new(network, EngineConfig::default()).unwrap();
    let before = weights(&engine);

    // Rows 2..=3, columns 2..=3 of the grid.
    let area = vec![
        GeoPoint::new(21.0315, 105.8315),
        GeoPoint::new(21.0315, 105.8335),
        GeoPoint::new(21.0335, 105.8335),
        GeoPoint::new(21.0335, 105.8315),
    ];
    let inside: Vec<NodeId> = engine
        .node_coords()
        .into_iter()
        .filter(|(_, p)| point_in_polygon(*p, &area))
        .map(|(n, _)| n)
        .collect();
    assert_eq!(inside.len(), 4);

    // Moderate water: every out-edge of the four inside nodes is slowed.
    let slowed = engine.flood(area.clone(), 0.3, None).unwrap();
    assert_eq!(slowed, 4 * 4);
    engine.unflood_last().unwrap();
    assert_eq!(weights(&engine), before);
    assert_eq!(engine.pending_restores().flood, 0);

    // High water: the inside nodes become unreachable.
    engine.flood(area, 1.0, None).unwrap();
    let corner = ids[0];
    for &n in &inside {
        let route = engine.find_path("A Star", n, corner, None).unwrap();
        assert_eq!(route.outcome, SearchOutcome::NoPath);
    }
    let restored = engine.unflood_last().unwrap();
    assert_eq!(restored, 16);
    engine.with_network(|net| {
        assert_eq!(net.edge_count(), before.len());
        for &n in &inside {
            for e in net.out_edges(n) {
                assert_eq!(e.weight, EngineConfig::default().restore_weight);
            }
        }
    });
}

#[test]
fn random_edit_sequences_restore_exactly_where_promised() {
    let (network, ids) = grid(5, 11);
    let engine = Engine::new(network, EngineConfig::default()).unwrap();
    let before = weights(&engine);
    let mut rng = SmallRng::seed_from_u64(2024);

    let mut applied = 0;
    for _ in 0..30 {
        let a = ids[rng.gen_range(0..ids.len())];
        let neighbours: Vec<NodeId> = engine.with_network(|net| net.out_neighbors_min(a).map(|(n, _)| n).collect());
        if neighbours.is_empty() {
            continue;
        }
        let b = neighbours[rng.gen_range(0..neighbours.len())];
        engine.congest(a, b, Some(rng.gen_range(1.5..8.0))).unwrap();
        applied += 1;
    }
    for _ in 0..applied {
        engine.uncongest_last().unwrap();
    }
    assert_eq!(weights(&engine), before);
}

#[test]
fn optimal_strategies_agree_after_edits() {
    let (network, ids) = grid(7, 3);
    let engine = Engine::new(network, EngineConfig::default()).unwrap();
    engine.ban_edge(ids[8], ids[9], Direction::Both).unwrap();
    engine.congest(ids[15], ids[16], None).unwrap();

    let (start, goal) = (ids[0], ids[48]);
    let best = engine.find_path("Dijkstra", start, goal, None).unwrap();
    let best = best.path().unwrap().total_weight;
    for name in ["UCS", "A Star"] {
        let w = engine.find_path(name, start, goal, None).unwrap().path().unwrap().total_weight;
        assert!((w - best).abs() < 1e-9, "{name}");
    }
    let greedy = engine.find_path("Greedy BFS", start, goal, None).unwrap();
    assert!(greedy.path().unwrap().total_weight + 1e-9 >= best);

    let est = engine.estimate(start, goal, None).unwrap();
    assert!((est.distance - best).abs() < 1e-9);
}

#[test]
fn concurrent_readers_and_writer() {
    let (network, ids) = grid(6, 5);
    let engine = Arc::new(Engine::new(network, EngineConfig::default()).unwrap());
    let (start, goal) = (ids[0], ids[35]);
    let baseline = engine.find_path("Dijkstra", start, goal, None).unwrap();
    let baseline = baseline.path().unwrap().total_weight;

    let writer = {
        let engine = Arc::clone(&engine);
        let (a, b) = (ids[14], ids[15]);
        thread::spawn(move || {
            for _ in 0..50 {
                engine.congest(a, b, Some(3.0)).unwrap();
                engine.uncongest_last().unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    let route = engine.find_path("A Star", start, goal, None).unwrap();
                    assert!(route.path().unwrap().total_weight + 1e-9 >= baseline);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    let after = engine.find_path("Dijkstra", start, goal, None).unwrap();
    assert!((after.path().unwrap().total_weight - baseline).abs() < 1e-9);
}

#[test]
fn engine_over_csv_network() {
    let nodes = "id,lat,lon\n10,21.0340,105.8340\n20,21.0350,105.8340\n30,21.0350,105.8350\n";
    let edges = "from,to,length,key\n10,20,111.2,\n20,30,104.0,\n10,30,400.0,\n20,10,111.2,\n";
    let loaded = load_network_reader(nodes.as_bytes(), edges.as_bytes()).unwrap();
    let (a, c) = (loaded.ids[&10], loaded.ids[&30]);
    let engine = Engine::new(loaded.network, EngineConfig::default()).unwrap();

    let route = engine.find_path("Dijkstra", a, c, None).unwrap();
    assert_eq!(route.path().unwrap().hop_count(), 2);
    let est = engine.estimate(a, c, Some(10.0)).unwrap();
    assert!((est.distance - 215.2).abs() < 1e-9);
    assert!((est.duration_s.unwrap() - 21.52).abs() < 1e-9);
}
