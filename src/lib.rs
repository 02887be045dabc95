//! # Studioledger - Asset ledger for live-streaming studios
//!
//! Tracks branch locations, rooms, master equipment assets, which room each
//! asset currently sits in, operator readiness checklists, and an
//! append-only audit trail.
//!
//! Studioledger provides:
//! - A single [`Ledger`] object owning every collection and enforcing the
//!   cross-collection rules (one room per asset, name propagation, cascades)
//! - Atomic checklist application
//! - SQLite-backed key/value persistence with a debounced background writer
//! - A [`Session`] tying the two together for front ends

pub mod model;
pub mod ledger;
pub mod storage;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{
    AssetLog, AssetStatus, Checklist, ChecklistItem, Location, LogKind, MasterAsset, Operator,
    Role, Room, RoomAsset, RoomStatus, WAREHOUSE_ROOM_ID,
};
pub use ledger::{Ledger, LedgerState, Session};
pub use storage::SqliteStore;

/// Result type alias for Studioledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Studioledger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Location {id} still has {rooms} room(s)")]
    LocationInUse { id: String, rooms: usize },

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Room assignment not found: {0}")]
    RoomAssetNotFound(String),

    #[error("Checklist not found: {0}")]
    ChecklistNotFound(String),
}
