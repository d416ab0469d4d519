//! User roles as perceived at the edge.
//!
//! Roles are assigned by the backend API; the edge only reads them to make
//! route-guard decisions and never grants or revokes them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user's role within the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A shopper with an order history and saved addresses.
    #[default]
    Customer,
    /// Backoffice staff with access to the admin dashboard.
    Admin,
    /// Backoffice staff with full administrative access.
    SuperAdmin,
}

/// Error parsing a role from its wire representation.
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(String);

impl Role {
    /// Whether this role grants access to the admin backoffice.
    #[must_use]
    pub const fn is_administrative(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// The wire representation used by the backend API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Customer, Role::Admin, Role::SuperAdmin] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_unknown() {
        assert!("wizard".parse::<Role>().is_err());
    }

    #[test]
    fn test_administrative_roles() {
        assert!(!Role::Customer.is_administrative());
        assert!(Role::Admin.is_administrative());
        assert!(Role::SuperAdmin.is_administrative());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(back, Role::Customer);
    }
}
