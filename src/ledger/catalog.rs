//! Catalog operations: locations, rooms, master assets, categories

use chrono::Utc;
use crate::{Error, Result};
use crate::model::{
    AssetDraft, AssetLog, AssetPatch, Location, LocationPatch, LogKind, MasterAsset, Operator,
    Room, RoomPatch, new_id,
};
use super::{Ledger, LABEL_REGISTERED, codes, normalize_categories};

impl Ledger {
    // ========== Locations ==========

    /// Add a location and return its new id
    pub fn add_location(&mut self, mut location: Location) -> String {
        location.id = new_id();
        let id = location.id.clone();
        tracing::debug!("Adding location {} ({})", location.name, id);
        self.state.locations.push(location);
        self.touch();
        id
    }

    pub fn update_location(&mut self, id: &str, patch: LocationPatch) -> Result<()> {
        let location = self
            .state
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| Error::LocationNotFound(id.to_string()))?;
        patch.apply_to(location);
        self.touch();
        Ok(())
    }

    /// Check that a location exists and has no rooms left.
    ///
    /// Run this before [`delete_location`](Ledger::delete_location), which
    /// does not cascade.
    pub fn ensure_location_empty(&self, id: &str) -> Result<()> {
        self.require_location(id)?;
        let rooms = self.rooms_in_location(id).len();
        if rooms > 0 {
            return Err(Error::LocationInUse { id: id.to_string(), rooms });
        }
        Ok(())
    }

    /// Remove a location.
    ///
    /// Rooms are not checked; see [`ensure_location_empty`](Ledger::ensure_location_empty).
    pub fn delete_location(&mut self, id: &str) -> Result<()> {
        let before = self.state.locations.len();
        self.state.locations.retain(|l| l.id != id);
        if self.state.locations.len() == before {
            return Err(Error::LocationNotFound(id.to_string()));
        }
        self.touch();
        Ok(())
    }

    // ========== Rooms ==========

    /// Add a room under an existing location and return its new id
    pub fn add_room(&mut self, mut room: Room) -> Result<String> {
        self.require_location(&room.location_id)?;
        room.id = new_id();
        let id = room.id.clone();
        tracing::debug!("Adding room {} ({})", room.name, id);
        self.state.rooms.push(room);
        self.touch();
        Ok(id)
    }

    /// Merge changes into a room. Moving a room to another location moves
    /// the assets assigned to it along with it.
    pub fn update_room(&mut self, id: &str, patch: RoomPatch) -> Result<()> {
        if let Some(location_id) = &patch.location_id {
            self.require_location(location_id)?;
        }

        let room = self
            .state
            .rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::RoomNotFound(id.to_string()))?;
        let old_location = room.location_id.clone();
        patch.apply_to(room);
        let new_location = room.location_id.clone();

        if new_location != old_location {
            let now = Utc::now();
            let assigned: Vec<String> = self
                .state
                .room_assets
                .iter()
                .filter(|ra| ra.room_id == id)
                .map(|ra| ra.asset_id.clone())
                .collect();
            for asset in self.state.assets.iter_mut().filter(|a| assigned.contains(&a.id)) {
                asset.location_id = new_location.clone();
                asset.updated_at = now;
            }
        }

        self.touch();
        Ok(())
    }

    /// Remove a room and every assignment to it. The assets themselves stay,
    /// unassigned. Returns how many assignments were released.
    pub fn delete_room(&mut self, id: &str) -> Result<usize> {
        self.require_room(id)?;
        self.state.rooms.retain(|r| r.id != id);

        let before = self.state.room_assets.len();
        self.state.room_assets.retain(|ra| ra.room_id != id);
        let released = before - self.state.room_assets.len();

        tracing::debug!("Deleted room {} ({} assets released)", id, released);
        self.touch();
        Ok(released)
    }

    // ========== Master assets ==========

    /// Add an asset and record its registration.
    ///
    /// A missing asset code is derived from the category; the modifier
    /// defaults to the acting operator.
    pub fn add_asset(&mut self, mut asset: MasterAsset, operator: Option<&Operator>) -> Result<String> {
        self.require_location(&asset.location_id)?;
        let operator = operator.cloned().unwrap_or_default();

        asset.id = new_id();
        if asset.asset_code.is_empty() {
            asset.asset_code = codes::next_asset_code(&self.state.assets, &asset.category);
        }
        if asset.last_modified_by.is_empty() {
            asset.last_modified_by = operator.name.clone();
        }
        asset.updated_at = Utc::now();

        let id = asset.id.clone();
        let log = AssetLog::new(&id, LogKind::System, &operator)
            .to_value(LABEL_REGISTERED)
            .notes(format!("{} ({}) terdaftar, kategori: {}", asset.name, asset.asset_code, asset.category));

        tracing::debug!("Registering asset {} [{}]", asset.name, asset.asset_code);
        self.state.assets.push(asset);
        self.append_log(log);
        self.touch();
        Ok(id)
    }

    /// Register `quantity` units described by `draft`, numbering names and
    /// codes. Either every unit is added or none is.
    pub fn register_assets(
        &mut self,
        draft: &AssetDraft,
        quantity: usize,
        operator: Option<&Operator>,
    ) -> Result<Vec<String>> {
        self.transact(|ledger| {
            let names = codes::unit_names(&ledger.state.assets, &draft.name, quantity);
            let mut ids = Vec::with_capacity(names.len());
            for name in names {
                let mut asset = MasterAsset::from_draft(draft);
                asset.name = name;
                ids.push(ledger.add_asset(asset, operator)?);
            }
            Ok(ids)
        })
    }

    /// Shallow-merge changes into an asset. A rename is copied onto the
    /// asset's room assignment.
    pub fn update_asset(&mut self, id: &str, patch: AssetPatch) -> Result<()> {
        let asset = self
            .asset_mut(id)
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))?;
        let renamed_from = patch.apply_to(asset);
        asset.updated_at = Utc::now();
        let name = asset.name.clone();

        if renamed_from.is_some() {
            for room_asset in self.state.room_assets.iter_mut().filter(|ra| ra.asset_id == id) {
                room_asset.asset_name = name.clone();
            }
        }

        self.touch();
        Ok(())
    }

    /// Remove an asset and its room assignment. Its audit logs are kept.
    pub fn delete_asset(&mut self, id: &str) -> Result<()> {
        self.require_asset(id)?;
        self.state.assets.retain(|a| a.id != id);
        self.state.room_assets.retain(|ra| ra.asset_id != id);
        self.touch();
        Ok(())
    }

    // ========== Categories ==========

    /// Add a category label. Returns false if it was blank or already present.
    pub fn add_category(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.state.categories.iter().any(|c| c == label) {
            return false;
        }
        self.state.categories.push(label.to_string());
        normalize_categories(&mut self.state.categories);
        self.touch();
        true
    }

    /// Remove a category label. Assets still using it are left alone.
    pub fn delete_category(&mut self, label: &str) -> bool {
        let label = label.trim();
        let before = self.state.categories.len();
        self.state.categories.retain(|c| c != label);
        if self.state.categories.len() == before {
            return false;
        }
        self.touch();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetStatus, RoomAsset};
    use crate::ledger::test_support::{operator, seeded};

    #[test]
    fn test_location_crud() {
        let mut ledger = Ledger::new();
        let id = ledger.add_location(Location::new("Surabaya", "Jl. Tunjungan"));
        assert!(!id.is_empty());

        ledger
            .update_location(&id, LocationPatch { name: Some("Surabaya Barat".into()), address: None })
            .unwrap();
        assert_eq!(ledger.location(&id).unwrap().name, "Surabaya Barat");
        assert_eq!(ledger.location(&id).unwrap().address, "Jl. Tunjungan");

        ledger.delete_location(&id).unwrap();
        assert!(ledger.location(&id).is_none());
        assert!(matches!(ledger.delete_location(&id), Err(Error::LocationNotFound(_))));
    }

    #[test]
    fn test_delete_location_does_not_cascade() {
        let (mut ledger, seed) = seeded();
        ledger.delete_location(&seed.jakarta).unwrap();
        assert_eq!(ledger.rooms_in_location(&seed.jakarta).len(), 2);
    }

    #[test]
    fn test_ensure_location_empty() {
        let (mut ledger, seed) = seeded();
        let medan = ledger.add_location(Location::new("Medan", ""));

        assert!(ledger.ensure_location_empty(&medan).is_ok());
        assert!(matches!(
            ledger.ensure_location_empty(&seed.jakarta),
            Err(Error::LocationInUse { rooms: 2, .. })
        ));
        assert!(matches!(ledger.ensure_location_empty("ghost"), Err(Error::LocationNotFound(_))));

        ledger.delete_room(&seed.studio_c).unwrap();
        assert!(ledger.ensure_location_empty(&seed.bandung).is_ok());
    }

    #[test]
    fn test_add_room_requires_location() {
        let mut ledger = Ledger::new();
        let result = ledger.add_room(Room::new("nowhere", "Studio X", ""));
        assert!(matches!(result, Err(Error::LocationNotFound(_))));
        assert!(ledger.rooms().is_empty());
    }

    #[test]
    fn test_delete_room_releases_only_its_assignments() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_b, &seed.mixer, ""), None).unwrap();

        let released = ledger.delete_room(&seed.studio_a).unwrap();

        assert_eq!(released, 1);
        assert!(ledger.room(&seed.studio_a).is_none());
        assert!(ledger.room_assets().iter().all(|ra| ra.room_id != seed.studio_a));
        assert_eq!(ledger.room_assets().len(), 1);
        assert_eq!(ledger.room_assets()[0].asset_id, seed.mixer);
        assert!(ledger.asset(&seed.camera).is_some());
    }

    #[test]
    fn test_room_relocation_moves_assigned_assets() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();

        ledger
            .update_room(&seed.studio_a, RoomPatch { location_id: Some(seed.bandung.clone()), ..Default::default() })
            .unwrap();

        assert_eq!(ledger.asset(&seed.camera).unwrap().location_id, seed.bandung);
        assert_eq!(ledger.asset(&seed.mixer).unwrap().location_id, seed.jakarta);
    }

    #[test]
    fn test_add_asset_logs_registration() {
        let (ledger, seed) = seeded();
        let camera = ledger.asset(&seed.camera).unwrap();
        assert_eq!(camera.asset_code, "KAM-001");
        assert_eq!(camera.last_modified_by, "Admin");

        let logs = ledger.logs_for_asset(&seed.camera);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].kind, LogKind::System);
        assert_eq!(logs[0].to_value.as_deref(), Some(LABEL_REGISTERED));
        assert!(logs[0].notes.as_deref().unwrap().contains("Kamera"));
    }

    #[test]
    fn test_register_assets_numbers_units_and_codes() {
        let (mut ledger, seed) = seeded();
        let draft = AssetDraft::new(&seed.jakarta, "Sony A7", "Kamera");

        let ids = ledger.register_assets(&draft, 2, Some(&operator("Rina"))).unwrap();

        assert_eq!(ids.len(), 2);
        let names: Vec<_> = ids.iter().map(|id| ledger.asset(id).unwrap().name.clone()).collect();
        let codes: Vec<_> = ids.iter().map(|id| ledger.asset(id).unwrap().asset_code.clone()).collect();
        assert_eq!(names, vec!["Sony A7 #2", "Sony A7 #3"]);
        assert_eq!(codes, vec!["KAM-002", "KAM-003"]);
        assert_eq!(ledger.asset(&ids[0]).unwrap().last_modified_by, "Rina");
    }

    #[test]
    fn test_add_asset_after_exhausted_code() {
        let (mut ledger, seed) = seeded();
        ledger
            .update_asset(&seed.camera, AssetPatch { asset_code: Some("KAM-4294967295".into()), ..Default::default() })
            .unwrap();

        let id = ledger
            .add_asset(MasterAsset::from_draft(&AssetDraft::new(&seed.jakarta, "Canon R6", "Kamera")), None)
            .unwrap();

        assert_eq!(ledger.asset(&id).unwrap().asset_code, "KAM-001");
    }

    #[test]
    fn test_register_assets_is_atomic() {
        let (mut ledger, _) = seeded();
        let before = ledger.state().clone();
        let draft = AssetDraft::new("nowhere", "Softbox", "Lighting");

        assert!(ledger.register_assets(&draft, 3, None).is_err());
        assert_eq!(ledger.state(), &before);
    }

    #[test]
    fn test_update_asset_propagates_rename() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, "stale"), None).unwrap();

        ledger
            .update_asset(
                &seed.camera,
                AssetPatch {
                    name: Some("Sony A7 IV".into()),
                    status: Some(AssetStatus::Servis),
                    ..Default::default()
                },
            )
            .unwrap();

        let asset = ledger.asset(&seed.camera).unwrap();
        assert_eq!(asset.name, "Sony A7 IV");
        assert_eq!(asset.status, AssetStatus::Servis);
        assert_eq!(asset.category, "Kamera");
        assert!(ledger
            .room_assets()
            .iter()
            .filter(|ra| ra.asset_id == seed.camera)
            .all(|ra| ra.asset_name == "Sony A7 IV"));
    }

    #[test]
    fn test_update_unknown_asset() {
        let mut ledger = Ledger::new();
        let result = ledger.update_asset("ghost", AssetPatch::default());
        assert!(matches!(result, Err(Error::AssetNotFound(_))));
    }

    #[test]
    fn test_delete_asset_keeps_logs() {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();
        let logs_before = ledger.logs_for_asset(&seed.camera).len();

        ledger.delete_asset(&seed.camera).unwrap();

        assert!(ledger.asset(&seed.camera).is_none());
        assert!(ledger.room_assets().iter().all(|ra| ra.asset_id != seed.camera));
        assert_eq!(ledger.logs_for_asset(&seed.camera).len(), logs_before);
    }

    #[test]
    fn test_categories_sorted_unique() {
        let mut ledger = Ledger::new();
        assert!(ledger.add_category("Drone"));
        assert!(!ledger.add_category(" Drone "));
        assert!(!ledger.add_category("   "));

        let categories = ledger.categories();
        let mut sorted = categories.to_vec();
        sorted.sort();
        assert_eq!(categories, sorted.as_slice());
        assert!(categories.iter().any(|c| c == "Drone"));

        assert!(ledger.delete_category("Drone"));
        assert!(!ledger.delete_category("Drone"));
    }

    #[test]
    fn test_delete_category_ignores_assets() {
        let (mut ledger, seed) = seeded();
        assert!(ledger.delete_category("Kamera"));
        assert_eq!(ledger.asset(&seed.camera).unwrap().category, "Kamera");
    }
}
