//! badinh — walkthrough of the rust_rn routing engine on a synthetic
//! Ba Đình street grid.
//!
//! Applies every edit kind, routes with every registered algorithm, and
//! restores each edit, printing routes as JSON.
//!
//! ```text
//! cargo run -p badinh                  # default EngineConfig
//! cargo run -p badinh -- config.json   # EngineConfig from JSON
//! RUST_LOG=debug cargo run -p badinh   # library logs
//! ```

mod district;

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use rn_core::{EngineConfig, GeoPoint};
use rn_edit::Direction;
use rn_engine::{Engine, Estimate, RouteResponse, Segment};

use district::{BA_DINH_SQUARE, QUAN_THANH_TEMPLE, build_district, square_around};

const MODERATE_WATER_M: f64 = 0.3;
const HIGH_WATER_M:     f64 = 0.8;

// ── JSON views ────────────────────────────────────────────────────────────────

fn point_json(p: GeoPoint) -> Value {
    json!([p.lat, p.lon])
}

fn segment_json(s: Option<Segment>) -> Value {
    s.map_or(Value::Null, |s| json!([point_json(s.from), point_json(s.to)]))
}

fn route_json(route: &RouteResponse) -> Value {
    match route.path() {
        Some(path) => json!({
            "algorithm":       route.algorithm,
            "found":           true,
            "max_depth":       route.max_depth,
            "nodes":           path.nodes.iter().map(|n| n.0).collect::<Vec<_>>(),
            "total_weight":    path.total_weight,
            "path":            path.lat_lon_pairs(),
            "start_connector": segment_json(route.start_connector),
            "goal_connector":  segment_json(route.goal_connector),
        }),
        None => json!({
            "algorithm": route.algorithm,
            "found":     false,
            "max_depth": route.max_depth,
        }),
    }
}

fn estimate_json(est: &Estimate) -> Value {
    json!({
        "hops":       est.nodes.len().saturating_sub(1),
        "distance_m": est.distance,
        "duration_s": est.duration_s,
    })
}

fn print_json(label: &str, value: &Value) -> Result<()> {
    println!("── {label}");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config() -> Result<EngineConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(EngineConfig::default());
    };
    log::info!("loading engine config from {path}");
    let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {path}"))?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    println!("=== badinh — rust_rn on a synthetic Ba Đình grid ===");
    println!("{}", serde_json::to_string(&config)?);
    println!();

    // 1. Network and engine.
    let district = build_district()?;
    let (sw, ne, centre) = (district.corner_sw(), district.corner_ne(), district.centre());
    let engine = Engine::new(district.network, config)?;
    let centre_pos = engine
        .node_coords()
        .get(centre.index())
        .map(|&(_, p)| p)
        .context("centre node missing")?;
    println!(
        "Road network: {} nodes, {} drawable segments, algorithms {:?}",
        engine.node_coords().len(),
        engine.edge_segments().len(),
        engine.algorithms()
    );
    println!();

    // 2. Baseline: every algorithm, south-west to north-east corner.
    for name in engine.algorithms() {
        let route = engine.find_path(name, sw, ne, None)?;
        print_json(&format!("baseline {name}"), &route_json(&route))?;
    }
    let baseline = engine.find_path("Dijkstra", sw, ne, None)?;
    let first_hop = baseline
        .path()
        .and_then(|p| p.nodes.get(..2))
        .map(|hop| (hop[0], hop[1]))
        .context("baseline route has no first hop")?;

    // 3. Close the first street of the best route, then reopen it.
    let removed = engine.ban_edge(first_hop.0, first_hop.1, Direction::Both)?;
    println!("banned {}→{}: {removed} edges removed", first_hop.0, first_hop.1);
    print_json("after ban", &route_json(&engine.find_path("Dijkstra", sw, ne, None)?))?;
    engine.unban_last()?;

    // 4. Congest it instead.
    engine.congest(first_hop.0, first_hop.1, None)?;
    print_json("after congestion", &route_json(&engine.find_path("A Star", sw, ne, None)?))?;
    engine.uncongest_last()?;

    // 5. Close the blocks around the centre.
    let removed = engine.ban_area(square_around(centre_pos, 0.001))?;
    println!("area ban around {centre_pos}: {removed} edges removed");
    print_json("after area ban", &route_json(&engine.find_path("UCS", sw, ne, None)?))?;
    engine.unban_last_area()?;

    // 6. Flood the centre: moderate water slows, high water closes.
    let flooded = square_around(centre_pos, 0.004);
    let before = engine.estimate(sw, ne, None)?;
    engine.flood(flooded.clone(), MODERATE_WATER_M, None)?;
    let slowed = engine.estimate(sw, ne, None)?;
    print_json(
        "estimate before / during moderate flood",
        &json!([estimate_json(&before), estimate_json(&slowed)]),
    )?;
    engine.unflood_last()?;

    engine.flood(flooded, HIGH_WATER_M, None)?;
    match engine.estimate(sw, ne, None) {
        Ok(est) => print_json("estimate during high flood", &estimate_json(&est))?,
        Err(e) if e.is_expected() => println!("high flood: {e} ({})", e.kind()),
        Err(e) => return Err(e.into()),
    }
    print_json("greedy during high flood", &route_json(&engine.find_path("Greedy BFS", sw, ne, None)?))?;
    engine.unflood_last()?;

    // 7. Point-to-point query between landmarks.
    let route = engine.route_between_points("A Star", BA_DINH_SQUARE, QUAN_THANH_TEMPLE, Some(64))?;
    print_json("Ba Đình Square → Quán Thánh", &route_json(&route))?;

    // 8. Everything restored.
    if let Err(e) = engine.unflood_last() {
        println!("restore with nothing pending: {} ({e})", e.kind());
    }
    println!("pending restores: {:?}", engine.pending_restores());

    Ok(())
}
