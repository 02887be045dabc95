//! Room assignments

use serde::{Deserialize, Serialize};

/// Sentinel room id meaning "back to the warehouse", i.e. unassigned.
pub const WAREHOUSE_ROOM_ID: &str = "GL-WAREHOUSE";

/// Places one asset in one room.
///
/// `asset_name` is a denormalized copy of the master asset's name; the
/// ledger rewrites it whenever the asset is renamed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomAsset {
    pub id: String,
    pub room_id: String,
    pub asset_id: String,
    pub asset_name: String,
}

impl RoomAsset {
    pub fn new(
        room_id: impl Into<String>,
        asset_id: impl Into<String>,
        asset_name: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            room_id: room_id.into(),
            asset_id: asset_id.into(),
            asset_name: asset_name.into(),
        }
    }
}

/// Whether a room id refers to the warehouse pool rather than a real room
pub fn is_warehouse(room_id: &str) -> bool {
    room_id == WAREHOUSE_ROOM_ID
}
