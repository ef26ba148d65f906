use thiserror::Error;

use rn_core::NodeId;
use rn_network::NetworkError;

use crate::EditKind;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("no edge between {from} and {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("nothing to restore: no {0} recorded")]
    NothingToRestore(EditKind),

    #[error("factor must be finite and > 0 and keep weights finite, got {factor}")]
    InvalidFactor { factor: f64 },

    #[error("unknown ban direction {0:?}: expected \"both\" or \"one-way\"")]
    InvalidDirection(String),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

pub type EditResult<T> = Result<T, EditError>;
