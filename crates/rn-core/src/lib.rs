//! `rn-core` — foundational types for the `rust_rn` road-network editor.
//!
//! This crate is a dependency of every other `rn-*` crate.  It has no `rn-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeKey`, `EdgeId`                         |
//! | [`cost`]        | `Cost` (totally ordered `f64` for heaps)              |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`polygon`]     | `Polygon`, `point_in_polygon` (even-odd ray casting)  |
//! | [`config`]      | `EngineConfig`, `FloodConfig`                         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod cost;
pub mod error;
pub mod geo;
pub mod ids;
pub mod polygon;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, FloodConfig};
pub use cost::Cost;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, EdgeKey, NodeId};
pub use polygon::{Polygon, point_in_polygon};
