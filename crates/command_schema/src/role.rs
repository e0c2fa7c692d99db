//! Caller privilege roles
//!
//! Roles form a total order from least to most privileged. A caller satisfies
//! a requirement when its own role is at least the required one.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Caller privilege levels, ordered by increasing privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    User,
    Manager,
    Owner,
}

impl Role {
    /// Parse a role from its wire literal.
    pub fn parse(value: &str) -> Result<Self, SchemaError> {
        match value {
            "viewer" => Ok(Self::Viewer),
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "owner" => Ok(Self::Owner),
            other => Err(SchemaError::InvalidMinimalRole {
                value: other.to_string(),
            }),
        }
    }

    /// Wire literal for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::User => "user",
            Self::Manager => "manager",
            Self::Owner => "owner",
        }
    }

    /// Whether a caller holding this role meets the given requirement.
    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_totally_ordered() {
        assert!(Role::Viewer < Role::User);
        assert!(Role::User < Role::Manager);
        assert!(Role::Manager < Role::Owner);
    }

    #[test]
    fn satisfies_follows_the_order() {
        assert!(Role::Owner.satisfies(Role::Viewer));
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::Viewer.satisfies(Role::Manager));
    }

    #[test]
    fn parse_round_trips_wire_literals() {
        for role in [Role::Viewer, Role::User, Role::Manager, Role::Owner] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn parse_rejects_unknown_literals() {
        let err = Role::parse("admin").unwrap_err();
        assert_eq!(err.code(), "invalid_minimal_role");
    }
}
