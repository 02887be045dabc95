//! The acting user, as supplied by the external identity provider

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Access level of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    Admin,
    Operator,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::SuperAdmin => "super-admin",
        }
    }

    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Operator, Role::SuperAdmin]
    }

    /// Admins and super-admins may manage the catalog; operators only submit checklists
    pub fn can_manage(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "operator" | "op" => Ok(Role::Operator),
            "super-admin" | "superadmin" | "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(Error::InvalidValue(format!("Unknown role: {}", s))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is performing an action. Stamped onto audit logs and checklists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Operator {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// The generic actor used when a caller does not say who it is
    pub fn admin() -> Self {
        Self::new("admin", "Admin", Role::Admin)
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in Role::all() {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), *role);
        }
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super-admin\"");
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::SuperAdmin.can_manage());
        assert!(!Role::Operator.can_manage());
    }
}
