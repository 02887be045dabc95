//! Audit trail entries

use crate::{Error, Result};
use super::operator::{Operator, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of event an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogKind {
    /// Condition reported for an asset
    #[default]
    Status,
    /// Asset entered, left or changed room
    Movement,
    /// Catalog bookkeeping such as registration
    System,
    /// Operator login or logout
    Auth,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Status => "STATUS",
            LogKind::Movement => "MOVEMENT",
            LogKind::System => "SYSTEM",
            LogKind::Auth => "AUTH",
        }
    }

    pub fn all() -> &'static [LogKind] {
        &[LogKind::Status, LogKind::Movement, LogKind::System, LogKind::Auth]
    }
}

impl FromStr for LogKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "STATUS" => Ok(LogKind::Status),
            "MOVEMENT" | "MOVE" => Ok(LogKind::Movement),
            "SYSTEM" => Ok(LogKind::System),
            "AUTH" => Ok(LogKind::Auth),
            _ => Err(Error::InvalidValue(format!("Unknown log type: {}", s))),
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session events recorded as AUTH entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Login,
    Logout,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::Login => "LOGIN",
            AuthEvent::Logout => "LOGOUT",
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetLog {
    pub id: String,
    pub asset_id: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_value: Option<String>,
    pub operator_name: String,
    pub operator_role: Role,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AssetLog {
    /// Start a log entry; the ledger assigns the id on append
    pub fn new(asset_id: impl Into<String>, kind: LogKind, operator: &Operator) -> Self {
        Self {
            id: String::new(),
            asset_id: asset_id.into(),
            kind,
            from_value: None,
            to_value: None,
            operator_name: operator.name.clone(),
            operator_role: operator.role,
            timestamp: Utc::now(),
            notes: None,
        }
    }

    pub fn from_value(mut self, value: impl Into<String>) -> Self {
        self.from_value = Some(value.into());
        self
    }

    pub fn to_value(mut self, value: impl Into<String>) -> Self {
        self.to_value = Some(value.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serialized_as_type() {
        let log = AssetLog::new("a1", LogKind::Movement, &Operator::admin()).to_value("Ditarik ke Gudang");
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["type"], "MOVEMENT");
        assert_eq!(json["operatorRole"], "admin");
        assert!(json.get("fromValue").is_none());
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in LogKind::all() {
            assert_eq!(LogKind::from_str(kind.as_str()).unwrap(), *kind);
        }
    }
}
