//! Network-subsystem error type.

use thiserror::Error;

use rn_core::NodeId;

/// Errors produced by `rn-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge {from}→{to} has invalid weight {weight}: weights must be finite and > 0")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("node {node} has non-finite position ({lat}, {lon})")]
    InvalidPosition { node: NodeId, lat: f64, lon: f64 },

    #[error("edge references unknown node id {0}")]
    UnknownExternalId(i64),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
