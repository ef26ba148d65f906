//! `rn-edit` — reversible edits to a [`RoadNetwork`](rn_network::RoadNetwork).
//!
//! Four edit categories each keep their own undo slot inside one
//! [`EditLedger`]:
//!
//! | Category   | Edit            | Restore              | Restore fidelity                  |
//! |------------|-----------------|----------------------|-----------------------------------|
//! | Ban        | `ban_edge`      | `unban_last`         | default weight                    |
//! | Area ban   | `ban_area`      | `unban_last_area`    | original keys, default weight     |
//! | Congestion | `congest`       | `uncongest_last`     | exact original weights            |
//! | Flood      | `flood`         | `unflood_last`       | slowed: exact; removed: default   |
//!
//! Bans, area bans, and congestion are stacks where only the most recent
//! record can be restored.  Flood is a single batch replaced by every new
//! flood.
//!
//! Every edit validates its inputs before touching the network, so a failed
//! edit leaves the network and all four slots unchanged.

pub mod error;
pub mod ledger;
pub mod record;


pub use error::{EditError, EditResult};
pub use ledger::{EditLedger, PendingRestores};
pub use record::{
    AreaBanRecord, BanRecord, CongestionRecord, Direction, EditKind, FloodEffect, FloodEntry,
    FloodParams, RemovedEdge,
};
pub use record::FloodAction;
