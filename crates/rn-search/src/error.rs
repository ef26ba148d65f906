use rn_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("unknown search algorithm {0:?}")]
    InvalidAlgorithm(String),

    #[error("node {0} is not in the search graph")]
    NodeNotFound(NodeId),
}

pub type SearchResult<T> = Result<T, SearchError>;
