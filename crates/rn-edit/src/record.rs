//! Undo records and edit parameters.

use std::fmt;
use std::str::FromStr;

use rn_core::{EdgeKey, FloodConfig, NodeId, Polygon};

use crate::EditError;

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Which directions of a node pair a ban closes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Close `A→B` and `B→A`.
    #[default]
    Both,
    /// Close `A→B` only.
    OneWay,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Both   => "both",
            Direction::OneWay => "one-way",
        }
    }
}

impl FromStr for Direction {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "both" => Ok(Direction::Both),
            "one-way" | "oneway" => Ok(Direction::OneWay),
            other => Err(EditError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four independent undo categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    Ban,
    AreaBan,
    Congestion,
    Flood,
}

impl EditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EditKind::Ban        => "ban",
            EditKind::AreaBan    => "area ban",
            EditKind::Congestion => "congestion",
            EditKind::Flood      => "flood",
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// One `ban_edge` call.  Weights are not kept: restoring re-inserts a
/// default-weight edge for each direction that actually lost edges.
#[derive(Clone, Debug, PartialEq)]
pub struct BanRecord {
    pub from:      NodeId,
    pub to:        NodeId,
    pub direction: Direction,
    /// `from → to` had at least one edge that was removed.
    pub forward_removed:  bool,
    /// `to → from` had at least one edge that was removed (`Both` only).
    pub backward_removed: bool,
}

/// Identity of a removed parallel edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RemovedEdge {
    pub from: NodeId,
    pub to:   NodeId,
    pub key:  EdgeKey,
}

/// One `ban_area` call: the polygon and every edge it removed, in removal order.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaBanRecord {
    pub polygon: Polygon,
    pub removed: Vec<RemovedEdge>,
}

/// One `congest` call: the pre-congestion weight of each parallel edge.
#[derive(Clone, Debug, PartialEq)]
pub struct CongestionRecord {
    pub from:     NodeId,
    pub to:       NodeId,
    pub original: Vec<(EdgeKey, f64)>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FloodEffect {
    Removed,
    Slowed { original_weight: f64 },
}

/// One edge touched by the current flood.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloodEntry {
    pub from:   NodeId,
    pub to:     NodeId,
    pub key:    EdgeKey,
    pub effect: FloodEffect,
}

// ── Flood parameters ──────────────────────────────────────────────────────────

/// Inputs of one flood edit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloodParams {
    /// Observed water level in metres.
    pub water_level:    f64,
    pub ban_threshold:  f64,
    pub slow_threshold: f64,
    pub slow_factor:    f64,
}

impl FloodParams {
    /// Water level `water_level` with thresholds from `config`.
    pub fn with_config(water_level: f64, config: &FloodConfig) -> Self {
        Self {
            water_level,
            ban_threshold:  config.ban_threshold,
            slow_threshold: config.slow_threshold,
            slow_factor:    config.slow_factor,
        }
    }

    /// What this flood does to every edge leaving a flooded node.
    pub fn effect(&self) -> FloodAction {
        if self.water_level >= self.ban_threshold {
            FloodAction::Remove
        } else if self.water_level >= self.slow_threshold {
            FloodAction::Slow
        } else {
            FloodAction::None
        }
    }
}

/// Outcome of comparing the water level with the thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FloodAction {
    Remove,
    Slow,
    None,
}
