//! CSV network loader.
//!
//! # CSV format
//!
//! Two files, one for nodes and one for directed edges.  Node ids are the
//! source data's 64-bit ids (e.g. OSM node ids); they are mapped to dense
//! `NodeId`s in file order.
//!
//! ```csv
//! id,lat,lon
//! 366396511,21.0340,105.8342
//! 366396514,21.0362,105.8380
//! ```
//!
//! ```csv
//! from,to,length,key
//! 366396511,366396514,461.2,0
//! 366396514,366396511,461.2,
//! ```
//!
//! `length` is the edge weight and must be > 0.  `key` is optional (column
//! may be absent or empty); keyless edges get the next free parallel key.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use rn_core::{EdgeKey, GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{NetworkError, NetworkResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:   i64,
    to:     i64,
    length: f64,
    #[serde(default)]
    key:    Option<u32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// A loaded network plus the mapping from source ids to `NodeId`s.
pub struct LoadedNetwork {
    pub network: RoadNetwork,
    pub ids:     FxHashMap<i64, NodeId>,
}

/// Load a road network from a node CSV and an edge CSV.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> NetworkResult<LoadedNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_network_reader(nodes, edges)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_network_reader<N: Read, E: Read>(nodes: N, edges: E) -> NetworkResult<LoadedNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut ids: FxHashMap<i64, NodeId> = FxHashMap::default();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        if ids.contains_key(&row.id) {
            return Err(NetworkError::Parse(format!("duplicate node id {}", row.id)));
        }
        if !row.lat.is_finite() || !row.lon.is_finite() {
            return Err(NetworkError::Parse(format!(
                "node {} has non-finite position ({}, {})",
                row.id, row.lat, row.lon
            )));
        }
        let id = builder.add_node(GeoPoint::new(row.lat, row.lon));
        ids.insert(row.id, id);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let from = lookup(&ids, row.from)?;
        let to = lookup(&ids, row.to)?;
        match row.key {
            Some(k) => builder.add_keyed_edge(from, to, EdgeKey(k), row.length),
            None => builder.add_directed_edge(from, to, row.length),
        }
    }

    let network = builder.build()?;
    log::info!(
        "loaded road network: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );
    Ok(LoadedNetwork { network, ids })
}

fn lookup(ids: &FxHashMap<i64, NodeId>, external: i64) -> NetworkResult<NodeId> {
    ids.get(&external)
        .copied()
        .ok_or(NetworkError::UnknownExternalId(external))
}
