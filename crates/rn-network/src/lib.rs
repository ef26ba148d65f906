//! `rn-network` — the editable road network and its derived search graph.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (multigraph + R-tree), `RoadNetworkBuilder`     |
//! | [`simplify`] | `SimplifiedGraph` (CSR, one edge per ordered node pair)       |
//! | [`shortest`] | `shortest_path_by_weight` over the unsimplified multigraph    |
//! | [`loader`]   | `load_network_csv`, `load_network_reader`                     |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `rn-core` types.        |

pub mod error;
pub mod loader;
pub mod network;
pub mod shortest;
pub mod simplify;


pub use error::{NetworkError, NetworkResult};
pub use loader::{LoadedNetwork, load_network_csv, load_network_reader};
pub use network::{EdgeRef, RoadNetwork, RoadNetworkBuilder};
pub use shortest::{WeightedPath, shortest_path_by_weight};
pub use simplify::SimplifiedGraph;
