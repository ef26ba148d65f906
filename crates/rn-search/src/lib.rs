//! `rn-search` — interchangeable path-search strategies over a
//! [`SimplifiedGraph`](rn_network::SimplifiedGraph).
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`path`]     | `Path` — node sequence, coordinates, total weight          |
//! | [`strategy`] | `PathSearch` trait and the four built-in strategies        |
//! | [`registry`] | `AlgorithmRegistry` — name → strategy                      |
//! | [`error`]    | `SearchError`, `SearchResult<T>`                           |
//!
//! # Built-in strategies
//!
//! | Name           | Type                     | Optimal | Order of expansion      |
//! |----------------|--------------------------|---------|-------------------------|
//! | `"Dijkstra"`   | [`DijkstraSearch`]       | yes     | tentative cost          |
//! | `"UCS"`        | [`UniformCostSearch`]    | yes     | cost, with a closed set |
//! | `"A Star"`     | [`AStarSearch`]          | yes     | cost + heuristic        |
//! | `"Greedy BFS"` | [`GreedyBestFirstSearch`]| no      | heuristic only          |

pub mod error;
pub mod path;
pub mod registry;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use error::{SearchError, SearchResult};
pub use path::Path;
pub use registry::AlgorithmRegistry;
pub use strategy::{
    AStarSearch, DijkstraSearch, GreedyBestFirstSearch, PathSearch, UniformCostSearch,
};
