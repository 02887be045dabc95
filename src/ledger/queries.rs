//! Read-side views over the ledger

use serde::Serialize;
use crate::model::{AssetLog, AssetStatus, Checklist, LogKind, MasterAsset, Room, RoomAsset};
use super::Ledger;

/// Counts shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStats {
    pub locations: usize,
    pub rooms: usize,
    pub assets: usize,
    pub assigned: usize,
    pub in_warehouse: usize,
    pub checklists: usize,
    pub unread_checklists: usize,
    pub logs: usize,
    pub categories: usize,
    /// Asset count per condition, only conditions that occur
    pub by_status: Vec<(AssetStatus, usize)>,
}

impl std::fmt::Display for LedgerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Ledger Statistics:")?;
        writeln!(f, "  Locations: {}", self.locations)?;
        writeln!(f, "  Rooms: {}", self.rooms)?;
        writeln!(f, "  Assets: {} ({} assigned, {} in warehouse)", self.assets, self.assigned, self.in_warehouse)?;
        writeln!(f, "  Checklists: {} ({} unread)", self.checklists, self.unread_checklists)?;
        writeln!(f, "  Logs: {}", self.logs)?;
        write!(f, "  Categories: {}", self.categories)
    }
}

impl Ledger {
    pub fn rooms_in_location(&self, location_id: &str) -> Vec<&Room> {
        self.state.rooms.iter().filter(|r| r.location_id == location_id).collect()
    }

    pub fn assets_in_location(&self, location_id: &str) -> Vec<&MasterAsset> {
        self.state.assets.iter().filter(|a| a.location_id == location_id).collect()
    }

    pub fn assets_in_room(&self, room_id: &str) -> Vec<&MasterAsset> {
        self.state
            .room_assets
            .iter()
            .filter(|ra| ra.room_id == room_id)
            .filter_map(|ra| self.asset(&ra.asset_id))
            .collect()
    }

    /// The assignment for an asset, if it sits in a room
    pub fn assignment_of(&self, asset_id: &str) -> Option<&RoomAsset> {
        self.state.room_assets.iter().find(|ra| ra.asset_id == asset_id)
    }

    pub fn room_of_asset(&self, asset_id: &str) -> Option<&Room> {
        self.assignment_of(asset_id).and_then(|ra| self.room(&ra.room_id))
    }

    /// Assets not assigned to any room
    pub fn unassigned_assets(&self) -> Vec<&MasterAsset> {
        self.state
            .assets
            .iter()
            .filter(|a| self.assignment_of(&a.id).is_none())
            .collect()
    }

    /// Audit trail of one asset, newest first
    pub fn logs_for_asset(&self, asset_id: &str) -> Vec<&AssetLog> {
        let mut logs: Vec<_> = self.state.asset_logs.iter().filter(|l| l.asset_id == asset_id).collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs
    }

    /// Most recent audit entries, optionally of one kind, newest first
    pub fn recent_logs(&self, kind: Option<LogKind>, limit: usize) -> Vec<&AssetLog> {
        let mut logs: Vec<_> = self
            .state
            .asset_logs
            .iter()
            .filter(|l| kind.is_none_or(|k| l.kind == k))
            .collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(limit);
        logs
    }

    /// Checklists no admin has opened yet, newest first
    pub fn unread_checklists(&self) -> Vec<&Checklist> {
        let mut checklists: Vec<_> = self.state.checklists.iter().filter(|c| !c.is_read).collect();
        checklists.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        checklists
    }

    /// Latest checklist submitted for a room
    pub fn latest_checklist_for_room(&self, room_id: &str) -> Option<&Checklist> {
        self.state
            .checklists
            .iter()
            .filter(|c| c.room_id == room_id)
            .max_by_key(|c| c.timestamp)
    }

    pub fn stats(&self) -> LedgerStats {
        let assigned = self
            .state
            .assets
            .iter()
            .filter(|a| self.assignment_of(&a.id).is_some())
            .count();

        let by_status = AssetStatus::all()
            .iter()
            .map(|status| {
                let count = self.state.assets.iter().filter(|a| a.status == *status).count();
                (*status, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        LedgerStats {
            locations: self.state.locations.len(),
            rooms: self.state.rooms.len(),
            assets: self.state.assets.len(),
            assigned,
            in_warehouse: self.state.assets.len() - assigned,
            checklists: self.state.checklists.len(),
            unread_checklists: self.state.checklists.iter().filter(|c| !c.is_read).count(),
            logs: self.state.asset_logs.len(),
            categories: self.state.categories.len(),
            by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetPatch, Location, RoomAsset};
    use crate::ledger::test_support::seeded;

    #[test]
    fn test_room_and_location_views() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();

        assert_eq!(ledger.rooms_in_location(&seed.jakarta).len(), 2);
        assert_eq!(ledger.rooms_in_location(&seed.bandung).len(), 1);
        assert_eq!(ledger.assets_in_location(&seed.jakarta).len(), 2);

        let in_a = ledger.assets_in_room(&seed.studio_a);
        assert_eq!(in_a.len(), 1);
        assert_eq!(in_a[0].id, seed.camera);
        assert_eq!(ledger.room_of_asset(&seed.camera).unwrap().name, "Studio A");

        let unassigned = ledger.unassigned_assets();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].id, seed.mixer);
    }

    #[test]
    fn test_recent_logs_filter_and_limit() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();
        ledger.add_location(Location::new("Medan", ""));

        assert_eq!(ledger.recent_logs(None, 10).len(), 3);
        assert_eq!(ledger.recent_logs(Some(LogKind::Movement), 10).len(), 1);
        assert_eq!(ledger.recent_logs(Some(LogKind::System), 1).len(), 1);
        assert!(ledger.recent_logs(Some(LogKind::Auth), 10).is_empty());
    }

    #[test]
    fn test_stats() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();
        ledger
            .update_asset(&seed.mixer, AssetPatch { status: Some(AssetStatus::Rusak), ..Default::default() })
            .unwrap();

        let stats = ledger.stats();
        assert_eq!(stats.locations, 2);
        assert_eq!(stats.rooms, 3);
        assert_eq!(stats.assets, 2);
        assert_eq!(stats.assigned, 1);
        assert_eq!(stats.in_warehouse, 1);
        assert_eq!(stats.by_status, vec![(AssetStatus::Baik, 1), (AssetStatus::Rusak, 1)]);
    }
}
