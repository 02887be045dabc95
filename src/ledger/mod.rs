//! Asset Ledger - the single source of truth
//!
//! [`Ledger`] owns every collection and is the only place cross-collection
//! rules are enforced:
//! - an asset sits in at most one room at a time
//! - an asset's branch follows the room it is assigned to
//! - renaming an asset rewrites the denormalized name on its assignment
//! - deleting a room or asset releases its assignments, never its logs
//!
//! Operations that reference an entity by id fail with a not-found error
//! instead of silently doing nothing. Multi-step work (checklist
//! application, bulk registration) runs through [`Ledger::transact`] and is
//! all-or-nothing.

pub mod catalog;
pub mod codes;
pub mod movement;
pub mod checklist;
pub mod queries;
pub mod persist;
pub mod session;

pub use queries::LedgerStats;
pub use session::Session;

use serde::{Deserialize, Serialize};
use crate::{Error, Result};
use crate::model::{AssetLog, Checklist, Location, MasterAsset, Room, RoomAsset, new_id};

/// Audit label for an asset entering a room
pub const LABEL_ENTERED_ROOM: &str = "Masuk ke Ruangan";
/// Audit label for an asset moving between rooms
pub const LABEL_MOVED_TO: &str = "Pindah ke";
/// Audit label for an asset returned to the warehouse
pub const LABEL_RETURNED: &str = "Ditarik ke Gudang";
/// Audit label for a newly registered asset
pub const LABEL_REGISTERED: &str = "Registrasi Aset";
/// Subject id used for AUTH entries, which are not about a particular asset
pub const AUTH_LOG_SUBJECT: &str = "AUTH";

/// Categories a fresh ledger starts with
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Aksesoris",
    "Audio",
    "Kamera",
    "Komputer",
    "Lighting",
    "Mikrofon",
    "Monitor",
];

/// Every collection the ledger owns. This is also the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    pub locations: Vec<Location>,
    pub rooms: Vec<Room>,
    pub assets: Vec<MasterAsset>,
    pub room_assets: Vec<RoomAsset>,
    pub checklists: Vec<Checklist>,
    pub asset_logs: Vec<AssetLog>,
    pub categories: Vec<String>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            rooms: Vec::new(),
            assets: Vec::new(),
            room_assets: Vec::new(),
            checklists: Vec::new(),
            asset_logs: Vec::new(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The asset ledger store.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    state: LedgerState,
    /// Bumped on every successful mutation; lets callers detect changes
    revision: u64,
}

impl Ledger {
    /// An empty ledger with the default categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing state, normalizing the category list
    pub fn from_state(mut state: LedgerState) -> Self {
        normalize_categories(&mut state.categories);
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn locations(&self) -> &[Location] {
        &self.state.locations
    }

    pub fn rooms(&self) -> &[Room] {
        &self.state.rooms
    }

    pub fn assets(&self) -> &[MasterAsset] {
        &self.state.assets
    }

    pub fn room_assets(&self) -> &[RoomAsset] {
        &self.state.room_assets
    }

    pub fn checklists(&self) -> &[Checklist] {
        &self.state.checklists
    }

    pub fn asset_logs(&self) -> &[AssetLog] {
        &self.state.asset_logs
    }

    pub fn categories(&self) -> &[String] {
        &self.state.categories
    }

    /// Run `f` as one unit: if it fails, every collection is restored to
    /// what it was before the call.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved_state = self.state.clone();
        let saved_revision = self.revision;

        match f(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Ledger transaction rolled back: {}", e);
                self.state = saved_state;
                self.revision = saved_revision;
                Err(e)
            }
        }
    }

    // ========== Lookups ==========

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.state.locations.iter().find(|l| l.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.state.rooms.iter().find(|r| r.id == id)
    }

    pub fn asset(&self, id: &str) -> Option<&MasterAsset> {
        self.state.assets.iter().find(|a| a.id == id)
    }

    pub fn checklist(&self, id: &str) -> Option<&Checklist> {
        self.state.checklists.iter().find(|c| c.id == id)
    }

    pub fn require_location(&self, id: &str) -> Result<&Location> {
        self.location(id).ok_or_else(|| Error::LocationNotFound(id.to_string()))
    }

    pub fn require_room(&self, id: &str) -> Result<&Room> {
        self.room(id).ok_or_else(|| Error::RoomNotFound(id.to_string()))
    }

    pub fn require_asset(&self, id: &str) -> Result<&MasterAsset> {
        self.asset(id).ok_or_else(|| Error::AssetNotFound(id.to_string()))
    }

    pub fn require_checklist(&self, id: &str) -> Result<&Checklist> {
        self.checklist(id).ok_or_else(|| Error::ChecklistNotFound(id.to_string()))
    }

    fn asset_mut(&mut self, id: &str) -> Option<&mut MasterAsset> {
        self.state.assets.iter_mut().find(|a| a.id == id)
    }

    // ========== Internal bookkeeping ==========

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Append an audit entry, assigning its id
    fn append_log(&mut self, mut log: AssetLog) -> String {
        log.id = new_id();
        let id = log.id.clone();
        self.state.asset_logs.push(log);
        id
    }
}

/// Trim, drop empties, sort and dedup
pub(crate) fn normalize_categories(categories: &mut Vec<String>) {
    for category in categories.iter_mut() {
        let trimmed = category.trim();
        if trimmed.len() != category.len() {
            *category = trimmed.to_string();
        }
    }
    categories.retain(|c| !c.is_empty());
    categories.sort();
    categories.dedup();
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::{AssetDraft, Operator, Role};

    /// Ids of the entities seeded by [`seeded`]
    pub struct Seed {
        pub jakarta: String,
        pub bandung: String,
        pub studio_a: String,
        pub studio_b: String,
        pub studio_c: String,
        pub camera: String,
        pub mixer: String,
    }

    /// Two locations, three rooms (two in Jakarta), two unassigned assets in Jakarta
    pub fn seeded() -> (Ledger, Seed) {
        let mut ledger = Ledger::new();
        let jakarta = ledger.add_location(Location::new("Jakarta", "Jl. Sudirman 1"));
        let bandung = ledger.add_location(Location::new("Bandung", "Jl. Dago 2"));
        let studio_a = ledger.add_room(Room::new(&jakarta, "Studio A", "")).unwrap();
        let studio_b = ledger.add_room(Room::new(&jakarta, "Studio B", "")).unwrap();
        let studio_c = ledger.add_room(Room::new(&bandung, "Studio C", "")).unwrap();
        let camera = ledger
            .add_asset(MasterAsset::from_draft(&AssetDraft::new(&jakarta, "Sony A7", "Kamera")), None)
            .unwrap();
        let mixer = ledger
            .add_asset(MasterAsset::from_draft(&AssetDraft::new(&jakarta, "Yamaha MG10", "Audio")), None)
            .unwrap();

        (
            ledger,
            Seed {
                jakarta,
                bandung,
                studio_a,
                studio_b,
                studio_c,
                camera,
                mixer,
            },
        )
    }

    pub fn operator(name: &str) -> Operator {
        Operator::new(name.to_lowercase(), name, Role::Operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::seeded;

    #[test]
    fn test_new_ledger_has_default_categories() {
        let ledger = Ledger::new();
        assert_eq!(ledger.categories().len(), DEFAULT_CATEGORIES.len());
        assert!(ledger.locations().is_empty());
        assert_eq!(ledger.revision(), 0);
    }

    #[test]
    fn test_from_state_normalizes_categories() {
        let state = LedgerState {
            categories: vec![" Kamera".to_string(), "Audio".to_string(), "Kamera".to_string(), "".to_string()],
            ..LedgerState::default()
        };
        let ledger = Ledger::from_state(state);
        assert_eq!(ledger.categories(), &["Audio".to_string(), "Kamera".to_string()]);
    }

    #[test]
    fn test_transact_rolls_back_on_error() {
        let (mut ledger, seed) = seeded();
        let before = ledger.state().clone();
        let revision = ledger.revision();

        let result: Result<()> = ledger.transact(|l| {
            l.delete_asset(&seed.camera)?;
            l.delete_asset("missing")?;
            Ok(())
        });

        assert!(matches!(result, Err(Error::AssetNotFound(_))));
        assert_eq!(ledger.state(), &before);
        assert_eq!(ledger.revision(), revision);
    }

    #[test]
    fn test_transact_keeps_successful_work() {
        let (mut ledger, seed) = seeded();
        ledger
            .transact(|l| {
                l.delete_asset(&seed.camera)?;
                l.delete_asset(&seed.mixer)
            })
            .unwrap();
        assert!(ledger.assets().is_empty());
    }

    #[test]
    fn test_require_lookups() {
        let (ledger, seed) = seeded();
        assert_eq!(ledger.require_room(&seed.studio_a).unwrap().name, "Studio A");
        assert!(matches!(ledger.require_room("nope"), Err(Error::RoomNotFound(id)) if id == "nope"));
        assert!(matches!(ledger.require_location("nope"), Err(Error::LocationNotFound(_))));
        assert!(matches!(ledger.require_checklist("nope"), Err(Error::ChecklistNotFound(_))));
    }
}
