//! Loading and flushing the ledger through the key/value store
//!
//! Each collection lives under its own key and is loaded independently: a
//! missing key, a value that is not a JSON array, or an array that does not
//! parse falls back to that collection's default without affecting others.

use serde::de::DeserializeOwned;
use crate::Result;
use crate::storage::{SqliteStore, Snapshot, keys};
use super::{Ledger, LedgerState};

impl Ledger {
    /// Read every collection from `store`
    pub fn load(store: &SqliteStore) -> Result<Self> {
        let defaults = LedgerState::default();
        let state = LedgerState {
            locations: load_collection(store, keys::LOCATIONS, defaults.locations)?,
            rooms: load_collection(store, keys::ROOMS, defaults.rooms)?,
            assets: load_collection(store, keys::ASSETS, defaults.assets)?,
            room_assets: load_collection(store, keys::ROOM_ASSETS, defaults.room_assets)?,
            checklists: load_collection(store, keys::CHECKLISTS, defaults.checklists)?,
            asset_logs: load_collection(store, keys::ASSET_LOGS, defaults.asset_logs)?,
            categories: load_collection(store, keys::CATEGORIES, defaults.categories)?,
        };

        tracing::debug!(
            "Loaded ledger: {} locations, {} rooms, {} assets, {} logs",
            state.locations.len(),
            state.rooms.len(),
            state.assets.len(),
            state.asset_logs.len()
        );
        Ok(Self::from_state(state))
    }

    /// Write every collection to `store` in one transaction
    pub fn flush(&self, store: &mut SqliteStore) -> Result<()> {
        self.state.write_to(store)
    }
}

impl LedgerState {
    fn write_all(&self, store: &SqliteStore) -> Result<()> {
        store.set_json(keys::LOCATIONS, &self.locations)?;
        store.set_json(keys::ROOMS, &self.rooms)?;
        store.set_json(keys::ASSETS, &self.assets)?;
        store.set_json(keys::ROOM_ASSETS, &self.room_assets)?;
        store.set_json(keys::CHECKLISTS, &self.checklists)?;
        store.set_json(keys::ASSET_LOGS, &self.asset_logs)?;
        store.set_json(keys::CATEGORIES, &self.categories)?;
        Ok(())
    }
}

impl Snapshot for LedgerState {
    fn write_to(&self, store: &mut SqliteStore) -> Result<()> {
        store.begin_transaction()?;
        match self.write_all(store) {
            Ok(()) => store.commit(),
            Err(e) => {
                if let Err(rollback_err) = store.rollback() {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

fn load_collection<T: DeserializeOwned>(store: &SqliteStore, key: &str, default: Vec<T>) -> Result<Vec<T>> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(default);
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Stored '{}' is not valid JSON, using defaults: {}", key, e);
            return Ok(default);
        }
    };

    if !value.is_array() {
        tracing::warn!("Stored '{}' is not an array, using defaults", key);
        return Ok(default);
    }

    match serde_json::from_value(value) {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!("Stored '{}' could not be read, using defaults: {}", key, e);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetStatus, ChecklistDraft, ChecklistItem, RoomAsset};
    use crate::ledger::DEFAULT_CATEGORIES;
    use crate::ledger::test_support::{operator, seeded};

    fn populated() -> Ledger {
        let (mut ledger, seed) = seeded();
        ledger.add_room_asset(RoomAsset::new(&seed.studio_a, &seed.camera, ""), None).unwrap();
        let checklist = ledger
            .prepare_checklist(
                ChecklistDraft {
                    room_id: seed.studio_a.clone(),
                    items: vec![ChecklistItem::new(&seed.camera, "", AssetStatus::Rusak).with_notes("baterai")],
                    ..Default::default()
                },
                &operator("Op1"),
            )
            .unwrap();
        ledger.add_checklist(checklist);
        ledger.add_category("Drone");
        ledger
    }

    #[test]
    fn test_flush_then_load_roundtrip() {
        let ledger = populated();
        let mut store = SqliteStore::open_in_memory().unwrap();

        ledger.flush(&mut store).unwrap();
        let loaded = Ledger::load(&store).unwrap();

        assert_eq!(loaded.state(), ledger.state());
        assert_eq!(store.keys().unwrap().len(), keys::ALL.len());
    }

    #[test]
    fn test_load_empty_store_gives_defaults() {
        let store = SqliteStore::open_in_memory().unwrap();
        let loaded = Ledger::load(&store).unwrap();

        assert_eq!(loaded.state(), &LedgerState::default());
        assert_eq!(loaded.categories().len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_malformed_key_falls_back_alone() {
        let ledger = populated();
        let mut store = SqliteStore::open_in_memory().unwrap();
        ledger.flush(&mut store).unwrap();

        store.set_item(keys::ROOMS, r#"{"not":"an array"}"#).unwrap();
        store.set_item(keys::CHECKLISTS, "not json at all").unwrap();
        store.set_item(keys::ASSET_LOGS, r#"[{"type":"NOT_A_KIND"}]"#).unwrap();

        let loaded = Ledger::load(&store).unwrap();

        assert!(loaded.rooms().is_empty());
        assert!(loaded.checklists().is_empty());
        assert!(loaded.asset_logs().is_empty());
        assert_eq!(loaded.locations(), ledger.locations());
        assert_eq!(loaded.assets(), ledger.assets());
        assert_eq!(loaded.room_assets(), ledger.room_assets());
    }

    #[test]
    fn test_partial_records_are_default_filled() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set_item(keys::ASSETS, r#"[{"id":"a1","name":"Rode NT-USB","status":"BAIK"}]"#)
            .unwrap();

        let loaded = Ledger::load(&store).unwrap();

        let asset = loaded.asset("a1").unwrap();
        assert_eq!(asset.name, "Rode NT-USB");
        assert_eq!(asset.status, AssetStatus::Baik);
        assert_eq!(asset.location_id, "");
        assert!(asset.entry_date.is_none());
    }

    #[test]
    fn test_stored_categories_are_normalized() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_item(keys::CATEGORIES, r#"["Monitor","Audio","Audio"]"#).unwrap();

        let loaded = Ledger::load(&store).unwrap();
        assert_eq!(loaded.categories(), &["Audio".to_string(), "Monitor".to_string()]);
    }
}
