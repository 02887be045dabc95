//! Operator readiness checklists

use crate::{Error, Result};
use super::asset::AssetStatus;
use super::operator::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Readiness of a room as reported by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoomStatus {
    #[serde(rename = "LIVE_NOW")]
    LiveNow,
    #[serde(rename = "READY_FOR_LIVE")]
    ReadyForLive,
    #[serde(rename = "NOT_READY")]
    NotReady,
    #[serde(rename = "STANDBY")]
    Standby,
    #[serde(rename = "FINISHED_LIVE")]
    FinishedLive,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::LiveNow => "LIVE_NOW",
            RoomStatus::ReadyForLive => "READY_FOR_LIVE",
            RoomStatus::NotReady => "NOT_READY",
            RoomStatus::Standby => "STANDBY",
            RoomStatus::FinishedLive => "FINISHED_LIVE",
            RoomStatus::Unset => "",
        }
    }

    pub fn all() -> &'static [RoomStatus] {
        &[
            RoomStatus::LiveNow,
            RoomStatus::ReadyForLive,
            RoomStatus::NotReady,
            RoomStatus::Standby,
            RoomStatus::FinishedLive,
            RoomStatus::Unset,
        ]
    }
}

impl FromStr for RoomStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "LIVE_NOW" | "LIVE" => Ok(RoomStatus::LiveNow),
            "READY_FOR_LIVE" | "READY" => Ok(RoomStatus::ReadyForLive),
            "NOT_READY" => Ok(RoomStatus::NotReady),
            "STANDBY" => Ok(RoomStatus::Standby),
            "FINISHED_LIVE" | "FINISHED" => Ok(RoomStatus::FinishedLive),
            "" | "NONE" => Ok(RoomStatus::Unset),
            _ => Err(Error::InvalidValue(format!("Unknown room status: {}", s))),
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Unset => write!(f, "-"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// One asset line in a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub asset_id: String,
    pub asset_name: String,
    pub status: AssetStatus,
    pub notes: String,
    /// Destination room if the operator moved the asset, or
    /// [`WAREHOUSE_ROOM_ID`](super::WAREHOUSE_ROOM_ID) to send it back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to_room_id: Option<String>,
}

impl ChecklistItem {
    pub fn new(asset_id: impl Into<String>, asset_name: impl Into<String>, status: AssetStatus) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_name: asset_name.into(),
            status,
            notes: String::new(),
            moved_to_room_id: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn moved_to(mut self, room_id: impl Into<String>) -> Self {
        self.moved_to_room_id = Some(room_id.into());
        self
    }
}

/// A submitted readiness report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checklist {
    pub id: String,
    pub location_id: String,
    pub location_name: String,
    pub room_id: String,
    pub room_name: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Role of the submitter; older records without one were operators
    #[serde(default = "submitter_role")]
    pub operator_role: Role,
    pub timestamp: DateTime<Utc>,
    pub overall_notes: String,
    pub room_status: RoomStatus,
    pub items: Vec<ChecklistItem>,
    /// Set once an admin has opened the report
    pub is_read: bool,
}

fn submitter_role() -> Role {
    Role::Operator
}

/// What an operator fills in; names, operator and time are resolved by the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistDraft {
    pub room_id: String,
    pub overall_notes: String,
    pub room_status: RoomStatus,
    pub items: Vec<ChecklistItem>,
}
