//! Room assignment operations
//!
//! Every change of where an asset sits goes through here and leaves a
//! MOVEMENT entry in the audit trail.

use chrono::Utc;
use crate::{Error, Result};
use crate::model::{AssetLog, LogKind, Operator, RoomAsset, new_id};
use crate::model::room_asset::is_warehouse;
use super::{Ledger, LABEL_ENTERED_ROOM, LABEL_MOVED_TO, LABEL_RETURNED};

impl Ledger {
    /// Assign an asset to a room, replacing any earlier assignment.
    ///
    /// The asset's branch is set to the room's location. The stored name is
    /// taken from the master asset, not from `room_asset`.
    pub fn add_room_asset(&mut self, room_asset: RoomAsset, operator: Option<&Operator>) -> Result<String> {
        let operator = operator.cloned().unwrap_or_default();
        let room = self.require_room(&room_asset.room_id)?.clone();
        let asset_name = self.require_asset(&room_asset.asset_id)?.name.clone();
        let asset_id = room_asset.asset_id;

        let previous_room = self.room_of_asset(&asset_id).map(|r| r.name.clone());
        self.state.room_assets.retain(|ra| ra.asset_id != asset_id);

        let id = new_id();
        self.state.room_assets.push(RoomAsset {
            id: id.clone(),
            room_id: room.id.clone(),
            asset_id: asset_id.clone(),
            asset_name,
        });
        self.follow_room_location(&asset_id, &room.location_id);

        let mut log = AssetLog::new(&asset_id, LogKind::Movement, &operator)
            .to_value(format!("{}: {}", LABEL_ENTERED_ROOM, room.name));
        if let Some(previous) = previous_room {
            log = log.from_value(previous);
        }
        self.append_log(log);

        tracing::debug!("Asset {} assigned to room {}", asset_id, room.name);
        self.touch();
        Ok(id)
    }

    /// Remove an assignment by its id, returning the asset to the warehouse.
    ///
    /// The audit entry is attributed to `operator`, or to the generic admin
    /// when none is given.
    pub fn delete_room_asset(&mut self, id: &str, operator: Option<&Operator>) -> Result<()> {
        let index = self
            .state
            .room_assets
            .iter()
            .position(|ra| ra.id == id)
            .ok_or_else(|| Error::RoomAssetNotFound(id.to_string()))?;
        let removed = self.state.room_assets.remove(index);
        let operator = operator.cloned().unwrap_or_default();

        let log = AssetLog::new(&removed.asset_id, LogKind::Movement, &operator)
            .from_value(self.room_label(&removed.room_id))
            .to_value(LABEL_RETURNED);
        self.append_log(log);

        tracing::debug!("Assignment {} removed", id);
        self.touch();
        Ok(())
    }

    /// Move an assigned asset to another room, or to the warehouse when
    /// `new_room_id` is [`WAREHOUSE_ROOM_ID`](crate::model::WAREHOUSE_ROOM_ID).
    ///
    /// Sending an unassigned asset to the warehouse changes nothing. Moving
    /// an unassigned asset to a room is an error; use
    /// [`add_room_asset`](Ledger::add_room_asset) for that.
    pub fn move_room_asset(&mut self, asset_id: &str, new_room_id: &str, operator: Option<&Operator>) -> Result<()> {
        self.require_asset(asset_id)?;
        let operator = operator.cloned().unwrap_or_default();
        let current = self.state.room_assets.iter().position(|ra| ra.asset_id == asset_id);

        if is_warehouse(new_room_id) {
            let Some(index) = current else {
                tracing::debug!("Asset {} already in warehouse", asset_id);
                return Ok(());
            };
            let removed = self.state.room_assets.remove(index);
            let log = AssetLog::new(asset_id, LogKind::Movement, &operator)
                .from_value(self.room_label(&removed.room_id))
                .to_value(LABEL_RETURNED);
            self.append_log(log);

            tracing::debug!("Asset {} returned to warehouse", asset_id);
            self.touch();
            return Ok(());
        }

        let room = self.require_room(new_room_id)?.clone();
        let index = current.ok_or_else(|| Error::RoomAssetNotFound(asset_id.to_string()))?;
        let from_room = std::mem::replace(&mut self.state.room_assets[index].room_id, room.id.clone());
        self.follow_room_location(asset_id, &room.location_id);

        let log = AssetLog::new(asset_id, LogKind::Movement, &operator)
            .from_value(self.room_label(&from_room))
            .to_value(format!("{}: {}", LABEL_MOVED_TO, room.name));
        self.append_log(log);

        tracing::debug!("Asset {} moved to room {}", asset_id, room.name);
        self.touch();
        Ok(())
    }

    /// An asset's branch follows its room
    fn follow_room_location(&mut self, asset_id: &str, location_id: &str) {
        if let Some(asset) = self.asset_mut(asset_id) {
            if asset.location_id != location_id {
                asset.location_id = location_id.to_string();
                asset.updated_at = Utc::now();
            }
        }
    }

    /// Room name for audit entries, falling back to the raw id for deleted rooms
    fn room_label(&self, room_id: &str) -> String {
        self.room(room_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| room_id.to_string())
    }
}
