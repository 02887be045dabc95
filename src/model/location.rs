//! Locations and rooms

use serde::{Deserialize, Serialize};

/// A branch studio.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: String,
}

impl Location {
    /// Create a location; the id is assigned when it is added to the ledger
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Shallow update for a location. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl LocationPatch {
    pub fn apply_to(self, location: &mut Location) {
        if let Some(name) = self.name {
            location.name = name;
        }
        if let Some(address) = self.address {
            location.address = address;
        }
    }
}

/// A streaming room inside a location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    pub id: String,
    pub location_id: String,
    pub name: String,
    pub description: String,
}

impl Room {
    pub fn new(
        location_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            location_id: location_id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Shallow update for a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    pub location_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RoomPatch {
    pub fn apply_to(self, room: &mut Room) {
        if let Some(location_id) = self.location_id {
            room.location_id = location_id;
        }
        if let Some(name) = self.name {
            room.name = name;
        }
        if let Some(description) = self.description {
            room.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_serializes_camel_case() {
        let room = Room::new("loc-1", "Studio A", "Main room");
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["locationId"], "loc-1");
        assert!(json.get("location_id").is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let room: Room = serde_json::from_str(r#"{"id":"r1","name":"Studio B"}"#).unwrap();
        assert_eq!(room.id, "r1");
        assert_eq!(room.location_id, "");
        assert_eq!(room.description, "");
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut location = Location::new("Jakarta", "Jl. Sudirman 1");
        LocationPatch {
            name: Some("Jakarta Pusat".to_string()),
            address: None,
        }
        .apply_to(&mut location);
        assert_eq!(location.name, "Jakarta Pusat");
        assert_eq!(location.address, "Jl. Sudirman 1");
    }
}
