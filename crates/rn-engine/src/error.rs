//! Engine error type and the stable codes a request layer maps to responses.

use thiserror::Error;

use rn_core::{CoreError, NodeId};
use rn_edit::EditError;
use rn_network::NetworkError;
use rn_search::SearchError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Expected outcome of an estimate between disconnected nodes.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("the road network has no nodes to snap to")]
    EmptyNetwork,
}

impl EngineError {
    /// Stable machine-readable code, one per error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Core(e) => match e {
                CoreError::InvalidPolygon { .. } => "invalid_polygon",
                CoreError::InvalidCoordinate { .. } => "invalid_coordinate",
                CoreError::Config(_) => "invalid_config",
            },
            EngineError::Network(e) => network_kind(e),
            EngineError::Edit(e) => match e {
                EditError::EdgeNotFound { .. } => "edge_not_found",
                EditError::NothingToRestore(_) => "nothing_to_restore",
                EditError::InvalidFactor { .. } => "invalid_factor",
                EditError::InvalidDirection(_) => "invalid_direction",
                EditError::Network(e) => network_kind(e),
            },
            EngineError::Search(e) => match e {
                SearchError::InvalidAlgorithm(_) => "invalid_algorithm",
                SearchError::NodeNotFound(_) => "node_not_found",
            },
            EngineError::NoPathFound { .. } => "no_path_found",
            EngineError::EmptyNetwork => "empty_network",
        }
    }

    /// `true` for negative results that are not failures.
    pub fn is_expected(&self) -> bool {
        matches!(self, EngineError::NoPathFound { .. })
    }
}

fn network_kind(e: &NetworkError) -> &'static str {
    match e {
        NetworkError::NodeNotFound(_) => "node_not_found",
        NetworkError::InvalidWeight { .. } => "invalid_weight",
        NetworkError::InvalidPosition { .. } => "invalid_coordinate",
        NetworkError::UnknownExternalId(_) => "unknown_external_id",
        NetworkError::Parse(_) => "parse_error",
        NetworkError::Io(_) => "io_error",
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
