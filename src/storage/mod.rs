//! Storage Layer - SQLite-backed persistence
//!
//! The durable store is a single string-keyed table, one JSON-serialized
//! array per ledger collection:
//! - kv_store(key, value, updated_at)
//!
//! Writes from a running session go through [`AutoSaver`], which debounces
//! bursts of changes on a background thread.

pub mod schema;
pub mod sqlite;
pub mod autosave;

pub use sqlite::{SqliteStore, StoreStats};
pub use autosave::{AutoSaver, Snapshot, DEFAULT_DEBOUNCE};

/// Storage keys, one per collection
pub mod keys {
    pub const LOCATIONS: &str = "locations";
    pub const ROOMS: &str = "rooms";
    pub const ASSETS: &str = "assets";
    pub const ROOM_ASSETS: &str = "room-assets";
    pub const CHECKLISTS: &str = "checklists";
    pub const ASSET_LOGS: &str = "asset-logs";
    pub const CATEGORIES: &str = "categories";

    pub const ALL: &[&str] = &[
        LOCATIONS,
        ROOMS,
        ASSETS,
        ROOM_ASSETS,
        CHECKLISTS,
        ASSET_LOGS,
        CATEGORIES,
    ];
}
