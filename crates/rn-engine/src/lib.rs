//! `rn-engine` — the entry points a request layer calls.
//!
//! [`Engine`] owns the road network, the edit ledger, and the cached search
//! graph behind a single mutex, and exposes:
//!
//! | Group     | Methods                                                              |
//! |-----------|----------------------------------------------------------------------|
//! | Edits     | `ban_edge`, `ban_area`, `congest`, `flood`                           |
//! | Restores  | `unban_last`, `unban_last_area`, `uncongest_last`, `unflood_last`    |
//! | Queries   | `find_path`, `route_between_points`, `estimate`, `snap`              |
//! | Overview  | `node_coords`, `edge_segments`, `pending_restores`, `algorithms`     |
//!
//! Errors carry a stable code from [`EngineError::kind`] for the response
//! layer to map.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rn_core::EngineConfig;
//! use rn_edit::Direction;
//! use rn_engine::Engine;
//!
//! let engine = Engine::new(network, EngineConfig::default())?;
//! engine.ban_edge(a, b, Direction::Both)?;
//! let route = engine.find_path("A Star", a, c, None)?;
//! engine.unban_last()?;
//! ```

pub mod engine;
pub mod error;
pub mod response;


pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use response::{Estimate, RouteResponse, SearchOutcome, Segment};
