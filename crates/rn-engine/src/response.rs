//! Query results returned by the engine.

use rn_core::{GeoPoint, NodeId};
use rn_search::Path;

/// A straight line between two coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: GeoPoint,
    pub to:   GeoPoint,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found(Path),
    /// Start and goal are not connected.  A valid answer, not an error.
    NoPath,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NoPath => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Answer to a path-search request.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResponse {
    pub algorithm: String,
    pub start:     NodeId,
    pub goal:      NodeId,
    /// The caller's expansion bound, echoed back unenforced.
    pub max_depth: Option<usize>,
    pub outcome:   SearchOutcome,
    /// Requested start coordinate → snapped start node, for point queries.
    pub start_connector: Option<Segment>,
    /// Snapped goal node → requested goal coordinate, for point queries.
    pub goal_connector:  Option<Segment>,
}

impl RouteResponse {
    pub fn path(&self) -> Option<&Path> {
        self.outcome.path()
    }

    /// Every coordinate to draw, connectors included, or empty if there is
    /// no path.
    pub fn polyline(&self) -> Vec<GeoPoint> {
        let Some(path) = self.path() else {
            return Vec::new();
        };
        let mut line = Vec::with_capacity(path.coords.len() + 2);
        line.extend(self.start_connector.map(|s| s.from));
        line.extend(path.coords.iter().copied());
        line.extend(self.goal_connector.map(|s| s.to));
        line
    }
}

/// Distance/time estimate over the live network.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    pub nodes:      Vec<NodeId>,
    /// Total weight of the lightest path.
    pub distance:   f64,
    /// `distance / speed`; `None` when the speed is not positive.
    pub duration_s: Option<f64>,
}
