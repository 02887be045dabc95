//! Master assets - the equipment catalog

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical condition of an asset.
///
/// Stored as the upper-case Indonesian label; an empty string means the
/// condition was never recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssetStatus {
    /// Good, in working order
    #[serde(rename = "BAIK")]
    Baik,
    /// Damaged but present
    #[serde(rename = "RUSAK")]
    Rusak,
    /// Dead, does not power on
    #[serde(rename = "MATI")]
    Mati,
    /// Out for service
    #[serde(rename = "SERVIS")]
    Servis,
    /// Sold
    #[serde(rename = "JUAL")]
    Jual,
    /// Lost
    #[serde(rename = "HILANG")]
    Hilang,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Baik => "BAIK",
            AssetStatus::Rusak => "RUSAK",
            AssetStatus::Mati => "MATI",
            AssetStatus::Servis => "SERVIS",
            AssetStatus::Jual => "JUAL",
            AssetStatus::Hilang => "HILANG",
            AssetStatus::Unset => "",
        }
    }

    pub fn all() -> &'static [AssetStatus] {
        &[
            AssetStatus::Baik,
            AssetStatus::Rusak,
            AssetStatus::Mati,
            AssetStatus::Servis,
            AssetStatus::Jual,
            AssetStatus::Hilang,
            AssetStatus::Unset,
        ]
    }
}

impl FromStr for AssetStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "BAIK" | "GOOD" => Ok(AssetStatus::Baik),
            "RUSAK" | "BROKEN" | "DAMAGED" => Ok(AssetStatus::Rusak),
            "MATI" | "DEAD" => Ok(AssetStatus::Mati),
            "SERVIS" | "SERVICE" => Ok(AssetStatus::Servis),
            "JUAL" | "SOLD" => Ok(AssetStatus::Jual),
            "HILANG" | "LOST" => Ok(AssetStatus::Hilang),
            "" | "-" | "NONE" => Ok(AssetStatus::Unset),
            _ => Err(Error::InvalidValue(format!("Unknown asset status: {}", s))),
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::Unset => write!(f, "-"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// One physical piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterAsset {
    pub id: String,
    /// Home branch; follows the room the asset is assigned to
    pub location_id: String,
    pub asset_code: String,
    pub name: String,
    pub category: String,
    pub status: AssetStatus,
    pub condition_notes: String,
    pub description: String,
    pub position: String,
    pub entry_date: Option<NaiveDate>,
    pub last_modified_by: String,
    pub updated_at: DateTime<Utc>,
}

impl MasterAsset {
    /// Build an asset from a registration draft. Id, code and timestamps are
    /// filled in by the ledger.
    pub fn from_draft(draft: &AssetDraft) -> Self {
        Self {
            id: String::new(),
            location_id: draft.location_id.clone(),
            asset_code: String::new(),
            name: draft.name.clone(),
            category: draft.category.clone(),
            status: draft.status,
            condition_notes: draft.condition_notes.clone(),
            description: draft.description.clone(),
            position: draft.position.clone(),
            entry_date: draft.entry_date,
            last_modified_by: String::new(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

/// Input for registering one or more units of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetDraft {
    pub location_id: String,
    pub name: String,
    pub category: String,
    pub status: AssetStatus,
    pub condition_notes: String,
    pub description: String,
    pub position: String,
    pub entry_date: Option<NaiveDate>,
}

impl AssetDraft {
    pub fn new(
        location_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            name: name.into(),
            category: category.into(),
            status: AssetStatus::Baik,
            ..Default::default()
        }
    }
}

/// Shallow update for a master asset. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatch {
    pub location_id: Option<String>,
    pub asset_code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<AssetStatus>,
    pub condition_notes: Option<String>,
    pub description: Option<String>,
    pub position: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub last_modified_by: Option<String>,
}

impl AssetPatch {
    pub fn is_empty(&self) -> bool {
        *self == AssetPatch::default()
    }

    /// Merge into `asset`, returning the previous name if it changed
    pub fn apply_to(self, asset: &mut MasterAsset) -> Option<String> {
        let mut renamed_from = None;
        if let Some(name) = self.name {
            if name != asset.name {
                renamed_from = Some(std::mem::replace(&mut asset.name, name));
            }
        }
        if let Some(location_id) = self.location_id {
            asset.location_id = location_id;
        }
        if let Some(asset_code) = self.asset_code {
            asset.asset_code = asset_code;
        }
        if let Some(category) = self.category {
            asset.category = category;
        }
        if let Some(status) = self.status {
            asset.status = status;
        }
        if let Some(notes) = self.condition_notes {
            asset.condition_notes = notes;
        }
        if let Some(description) = self.description {
            asset.description = description;
        }
        if let Some(position) = self.position {
            asset.position = position;
        }
        if self.entry_date.is_some() {
            asset.entry_date = self.entry_date;
        }
        if let Some(by) = self.last_modified_by {
            asset.last_modified_by = by;
        }
        renamed_from
    }
}
