//! The edit ledger: mutation entry points plus their undo slots.

use rustc_hash::FxHashSet;

use rn_core::{EdgeKey, EngineConfig, NodeId, Polygon};
use rn_network::{EdgeRef, RoadNetwork};

use crate::record::FloodAction;
use crate::{
    AreaBanRecord, BanRecord, CongestionRecord, Direction, EditError, EditKind, EditResult,
    FloodEffect, FloodEntry, FloodParams, RemovedEdge,
};

/// Depth of each undo slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingRestores {
    pub bans:       usize,
    pub area_bans:  usize,
    pub congestion: usize,
    /// Entries in the current flood batch (0 = nothing to restore).
    pub flood:      usize,
}

/// Applies edits to a [`RoadNetwork`] and records how to undo them.
///
/// The ledger does not own the network; callers pass it in so a single lock
/// can guard both (see `rn-engine`).  Passing a different network than the
/// one the records were taken from is a logic error.
#[derive(Debug)]
pub struct EditLedger {
    bans:           Vec<BanRecord>,
    area_bans:      Vec<AreaBanRecord>,
    congestion:     Vec<CongestionRecord>,
    flood:          Vec<FloodEntry>,
    restore_weight: f64,
}

impl EditLedger {
    /// `restore_weight` is the weight given to edges re-inserted by
    /// `unban_last`, `unban_last_area`, and `unflood_last`.
    pub fn new(restore_weight: f64) -> Self {
        Self {
            bans:       Vec::new(),
            area_bans:  Vec::new(),
            congestion: Vec::new(),
            flood:      Vec::new(),
            restore_weight,
        }
    }

    pub fn pending(&self) -> PendingRestores {
        PendingRestores {
            bans:       self.bans.len(),
            area_bans:  self.area_bans.len(),
            congestion: self.congestion.len(),
            flood:      self.flood.len(),
        }
    }

    pub fn bans(&self) -> &[BanRecord] {
        &self.bans
    }

    pub fn area_bans(&self) -> &[AreaBanRecord] {
        &self.area_bans
    }

    pub fn congestion(&self) -> &[CongestionRecord] {
        &self.congestion
    }

    /// The current flood batch, in application order.
    pub fn flood_batch(&self) -> &[FloodEntry] {
        &self.flood
    }

    // ── Ban ───────────────────────────────────────────────────────────────

    /// Close the road between `a` and `b`.
    ///
    /// `Both` removes every parallel edge `a→b` and `b→a`; `OneWay` only
    /// `a→b`.  Fails with `EdgeNotFound` if neither `a→b` nor `b→a` exists,
    /// even for `OneWay`.  Returns the number of edges removed (which is 0
    /// for a `OneWay` ban of a pair that only has `b→a`; the ban is still
    /// recorded).
    pub fn ban_edge(
        &mut self,
        net:       &mut RoadNetwork,
        a:         NodeId,
        b:         NodeId,
        direction: Direction,
    ) -> EditResult<usize> {
        if !net.has_edge(a, b) && !net.has_edge(b, a) {
            return Err(EditError::EdgeNotFound { from: a, to: b });
        }

        let forward = net.remove_parallel_edges(a, b);
        let backward = match direction {
            Direction::Both if a != b => net.remove_parallel_edges(b, a),
            _ => Vec::new(),
        };
        let removed = forward.len() + backward.len();

        self.bans.push(BanRecord {
            from: a,
            to: b,
            direction,
            forward_removed:  !forward.is_empty(),
            backward_removed: !backward.is_empty(),
        });
        log::info!("banned {a}→{b} ({direction}): {removed} edges removed");
        Ok(removed)
    }

    /// Undo the most recent ban by re-inserting one default-weight edge per
    /// direction that lost edges.  Returns the number of edges inserted.
    pub fn unban_last(&mut self, net: &mut RoadNetwork) -> EditResult<usize> {
        let record = self.bans.pop().ok_or(EditError::NothingToRestore(EditKind::Ban))?;

        let mut inserted = 0;
        if record.forward_removed {
            net.insert_edge(record.from, record.to, self.restore_weight)?;
            inserted += 1;
        }
        if record.backward_removed {
            net.insert_edge(record.to, record.from, self.restore_weight)?;
            inserted += 1;
        }
        log::info!(
            "restored ban {}→{} ({}): {inserted} edges re-inserted",
            record.from,
            record.to,
            record.direction
        );
        Ok(inserted)
    }

    // ── Area ban ──────────────────────────────────────────────────────────

    /// Remove every edge with either endpoint inside `polygon`.
    ///
    /// A polygon containing no nodes removes nothing and still succeeds
    /// (and still occupies a slot in the area-ban stack).
    pub fn ban_area(&mut self, net: &mut RoadNetwork, polygon: &Polygon) -> EditResult<usize> {
        let inside: FxHashSet<NodeId> = net.nodes_within(polygon).into_iter().collect();

        let doomed: Vec<RemovedEdge> = net
            .edges()
            .filter(|e| inside.contains(&e.from) || inside.contains(&e.to))
            .map(|e| RemovedEdge { from: e.from, to: e.to, key: e.key })
            .collect();

        for e in &doomed {
            net.remove_edge(e.from, e.to, e.key);
        }

        let removed = doomed.len();
        self.area_bans.push(AreaBanRecord { polygon: polygon.clone(), removed: doomed });
        log::info!("banned area: {} nodes inside, {removed} edges removed", inside.len());
        Ok(removed)
    }

    /// Undo the most recent area ban, re-inserting each removed edge under
    /// its original key with the default weight.
    pub fn unban_last_area(&mut self, net: &mut RoadNetwork) -> EditResult<usize> {
        let record = self
            .area_bans
            .pop()
            .ok_or(EditError::NothingToRestore(EditKind::AreaBan))?;

        for e in &record.removed {
            net.insert_edge_with_key(e.from, e.to, e.key, self.restore_weight)?;
        }
        log::info!("restored area ban: {} edges re-inserted", record.removed.len());
        Ok(record.removed.len())
    }

    // ── Congestion ────────────────────────────────────────────────────────

    /// Multiply every parallel edge `a→b` by `factor`.  Returns the number
    /// of parallel edges affected.
    pub fn congest(
        &mut self,
        net:    &mut RoadNetwork,
        a:      NodeId,
        b:      NodeId,
        factor: f64,
    ) -> EditResult<usize> {
        check_factor(factor)?;
        let original = net.parallel_edges(a, b);
        if original.is_empty() {
            return Err(EditError::EdgeNotFound { from: a, to: b });
        }
        let scaled = scale_all(&original, factor)?;

        for (key, weight) in scaled {
            net.set_weight(a, b, key, weight)?;
        }

        let affected = original.len();
        self.congestion.push(CongestionRecord { from: a, to: b, original });
        log::info!("congested {a}→{b} ×{factor}: {affected} parallel edges");
        Ok(affected)
    }

    /// Undo the most recent congestion, restoring exact original weights.
    pub fn uncongest_last(&mut self, net: &mut RoadNetwork) -> EditResult<usize> {
        let record = self
            .congestion
            .pop()
            .ok_or(EditError::NothingToRestore(EditKind::Congestion))?;

        let mut restored = 0;
        for &(key, weight) in &record.original {
            match net.set_weight(record.from, record.to, key, weight)? {
                Some(_) => restored += 1,
                None => log::warn!(
                    "congestion restore: edge {}→{} {key} no longer exists",
                    record.from,
                    record.to
                ),
            }
        }
        log::info!("restored congestion {}→{}: {restored} parallel edges", record.from, record.to);
        Ok(restored)
    }

    // ── Flood ─────────────────────────────────────────────────────────────

    /// Flood `polygon`.
    ///
    /// The previous flood batch is discarded (its effects stay in place) and
    /// replaced by a fresh one.  Every edge leaving a node inside the polygon
    /// is removed when `water_level >= ban_threshold`, else slowed by
    /// `slow_factor` when `water_level >= slow_threshold`, else untouched.
    /// Returns the number of edges affected.
    pub fn flood(
        &mut self,
        net:     &mut RoadNetwork,
        polygon: &Polygon,
        params:  FloodParams,
    ) -> EditResult<usize> {
        check_factor(params.slow_factor)?;
        let action = params.effect();

        let targets: Vec<EdgeRef> = match action {
            FloodAction::None => Vec::new(),
            _ => net
                .nodes_within(polygon)
                .into_iter()
                .flat_map(|n| net.out_edges(n).collect::<Vec<_>>())
                .collect(),
        };

        if action == FloodAction::Slow {
            for e in &targets {
                scale(e.weight, params.slow_factor)?;
            }
        }

        self.flood.clear();
        for e in targets {
            let effect = match action {
                FloodAction::Remove => {
                    net.remove_edge(e.from, e.to, e.key);
                    FloodEffect::Removed
                }
                FloodAction::Slow => {
                    net.set_weight(e.from, e.to, e.key, e.weight * params.slow_factor)?;
                    FloodEffect::Slowed { original_weight: e.weight }
                }
                FloodAction::None => continue,
            };
            self.flood.push(FloodEntry { from: e.from, to: e.to, key: e.key, effect });
        }

        log::info!(
            "flooded area at water level {} m ({action:?}): {} edges affected",
            params.water_level,
            self.flood.len()
        );
        Ok(self.flood.len())
    }

    /// Undo the current flood batch in reverse order, then clear it.
    ///
    /// Removed edges come back under their key with the default weight;
    /// slowed edges get their exact original weight.
    pub fn unflood_last(&mut self, net: &mut RoadNetwork) -> EditResult<usize> {
        if self.flood.is_empty() {
            return Err(EditError::NothingToRestore(EditKind::Flood));
        }

        let batch = std::mem::take(&mut self.flood);
        for e in batch.iter().rev() {
            match e.effect {
                FloodEffect::Removed => {
                    net.insert_edge_with_key(e.from, e.to, e.key, self.restore_weight)?;
                }
                FloodEffect::Slowed { original_weight } => {
                    if net.set_weight(e.from, e.to, e.key, original_weight)?.is_none() {
                        log::warn!("flood restore: edge {}→{} {} no longer exists", e.from, e.to, e.key);
                    }
                }
            }
        }
        log::info!("restored flood: {} edges", batch.len());
        Ok(batch.len())
    }
}

impl Default for EditLedger {
    fn default() -> Self {
        Self::new(EngineConfig::default().restore_weight)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_factor(factor: f64) -> EditResult<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidFactor { factor })
    }
}

fn scale(weight: f64, factor: f64) -> EditResult<f64> {
    let scaled = weight * factor;
    if scaled.is_finite() && scaled > 0.0 {
        Ok(scaled)
    } else {
        Err(EditError::InvalidFactor { factor })
    }
}

fn scale_all(edges: &[(EdgeKey, f64)], factor: f64) -> EditResult<Vec<(EdgeKey, f64)>> {
    edges
        .iter()
        .map(|&(key, weight)| scale(weight, factor).map(|w| (key, w)))
        .collect()
}
