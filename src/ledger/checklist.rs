//! Checklist submission and audit entries that are not about movement

use chrono::Utc;
use crate::Result;
use crate::model::{
    AssetLog, AssetPatch, AssetStatus, AuthEvent, Checklist, ChecklistDraft, LogKind, Operator,
    RoomAsset, new_id,
};
use crate::model::room_asset::is_warehouse;
use super::{Ledger, AUTH_LOG_SUBJECT};

impl Checklist {
    /// The operator who submitted this checklist
    pub fn operator(&self) -> Operator {
        Operator::new(&self.operator_id, &self.operator_name, self.operator_role)
    }
}

impl Ledger {
    /// Turn an operator's draft into a full checklist: resolves room and
    /// location names, fills missing asset names, stamps operator and time.
    pub fn prepare_checklist(&self, draft: ChecklistDraft, operator: &Operator) -> Result<Checklist> {
        let room = self.require_room(&draft.room_id)?;
        let location_name = self
            .location(&room.location_id)
            .map(|l| l.name.clone())
            .unwrap_or_default();

        let mut items = draft.items;
        for item in items.iter_mut() {
            let asset = self.require_asset(&item.asset_id)?;
            if item.asset_name.is_empty() {
                item.asset_name = asset.name.clone();
            }
        }

        Ok(Checklist {
            id: String::new(),
            location_id: room.location_id.clone(),
            location_name,
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            operator_id: operator.id.clone(),
            operator_name: operator.name.clone(),
            operator_role: operator.role,
            timestamp: Utc::now(),
            overall_notes: draft.overall_notes,
            room_status: draft.room_status,
            items,
            is_read: false,
        })
    }

    /// Store a checklist and write one STATUS entry per item.
    ///
    /// This records the report only; it does not touch assets or
    /// assignments. Use [`apply_checklist`](Ledger::apply_checklist) for that.
    pub fn add_checklist(&mut self, mut checklist: Checklist) -> String {
        checklist.id = new_id();
        checklist.is_read = false;
        let operator = checklist.operator();

        for item in &checklist.items {
            let mut log = AssetLog::new(&item.asset_id, LogKind::Status, &operator)
                .to_value(item.status.as_str())
                .notes(item.notes.clone())
                .at(checklist.timestamp);
            if let Some(asset) = self.asset(&item.asset_id) {
                log = log.from_value(asset.status.as_str());
            }
            self.append_log(log);
        }

        let id = checklist.id.clone();
        tracing::debug!(
            "Checklist {} for room {} recorded ({} items)",
            id,
            checklist.room_name,
            checklist.items.len()
        );
        self.state.checklists.push(checklist);
        self.touch();
        id
    }

    /// Asset changes a checklist implies: reported status, notes, and who
    /// checked it. Items for unknown assets and items that change nothing are
    /// skipped.
    pub fn derive_asset_updates(&self, checklist: &Checklist) -> Vec<(String, AssetPatch)> {
        checklist
            .items
            .iter()
            .filter_map(|item| {
                let asset = self.asset(&item.asset_id)?;
                let mut patch = AssetPatch::default();
                if item.status != AssetStatus::Unset && item.status != asset.status {
                    patch.status = Some(item.status);
                }
                if item.notes != asset.condition_notes {
                    patch.condition_notes = Some(item.notes.clone());
                }
                if patch.is_empty() {
                    return None;
                }
                patch.last_modified_by = Some(checklist.operator_name.clone());
                Some((item.asset_id.clone(), patch))
            })
            .collect()
    }

    /// Record a checklist and apply everything it implies as one unit:
    /// the STATUS entries, each relocation, and `updates`. If any step fails
    /// the ledger is left exactly as it was.
    pub fn apply_checklist(&mut self, checklist: Checklist, updates: Vec<(String, AssetPatch)>) -> Result<String> {
        self.transact(|ledger| {
            ledger.require_room(&checklist.room_id)?;
            for item in &checklist.items {
                ledger.require_asset(&item.asset_id)?;
            }

            let operator = checklist.operator();
            let relocations: Vec<(String, String)> = checklist
                .items
                .iter()
                .filter_map(|item| {
                    item.moved_to_room_id
                        .as_ref()
                        .map(|room_id| (item.asset_id.clone(), room_id.clone()))
                })
                .collect();

            let id = ledger.add_checklist(checklist);

            for (asset_id, room_id) in relocations {
                let current_room = ledger.room_of_asset(&asset_id).map(|r| r.id.clone());
                if is_warehouse(&room_id) {
                    ledger.move_room_asset(&asset_id, &room_id, Some(&operator))?;
                } else if current_room.as_deref() == Some(room_id.as_str()) {
                    continue;
                } else if current_room.is_some() {
                    ledger.move_room_asset(&asset_id, &room_id, Some(&operator))?;
                } else {
                    ledger.add_room_asset(RoomAsset::new(&room_id, &asset_id, ""), Some(&operator))?;
                }
            }

            for (asset_id, patch) in updates {
                ledger.update_asset(&asset_id, patch)?;
            }

            Ok(id)
        })
    }

    /// Flag a checklist as seen by an admin. Idempotent.
    pub fn mark_checklist_as_read(&mut self, id: &str) -> Result<()> {
        let checklist = self
            .state
            .checklists
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| crate::Error::ChecklistNotFound(id.to_string()))?;
        if !checklist.is_read {
            checklist.is_read = true;
            self.touch();
        }
        Ok(())
    }

    /// Record a login or logout
    pub fn record_auth(&mut self, operator: &Operator, event: AuthEvent) -> String {
        let log = AssetLog::new(AUTH_LOG_SUBJECT, LogKind::Auth, operator)
            .to_value(event.as_str())
            .notes(format!("{} ({})", operator.name, operator.role));
        let id = self.append_log(log);
        self.touch();
        id
    }
}
