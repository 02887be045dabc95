//! Ledger entities
//!
//! Every collection the ledger owns is a `Vec` of one of these types:
//! - `Location`: branch studio, root of the hierarchy
//! - `Room`: streaming room inside a location
//! - `MasterAsset`: one physical piece of equipment
//! - `RoomAsset`: which room an asset currently sits in (at most one per asset)
//! - `Checklist`: an operator's readiness report for a room
//! - `AssetLog`: append-only audit entry
//!
//! Field names serialize in camelCase, the format the stored collections use.

pub mod location;
pub mod asset;
pub mod room_asset;
pub mod checklist;
pub mod log;
pub mod operator;

pub use location::{Location, LocationPatch, Room, RoomPatch};
pub use asset::{AssetDraft, AssetPatch, AssetStatus, MasterAsset};
pub use room_asset::{RoomAsset, WAREHOUSE_ROOM_ID};
pub use checklist::{Checklist, ChecklistDraft, ChecklistItem, RoomStatus};
pub use log::{AssetLog, AuthEvent, LogKind};
pub use operator::{Operator, Role};

/// Generate a fresh random identifier for a new entity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
