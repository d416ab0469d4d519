//! User domain types.
//!
//! `EdgeUser` is the edge tier's view of a backend user: materialized per
//! request from the backend's profile response and never persisted locally.

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// A user as perceived at the edge.
///
/// The backend API is the source of truth for all of these fields; the edge
/// only reads them for session minting and route-guard decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeUser {
    /// Backend-issued user ID.
    pub id: UserId,
    /// Role assigned by the backend.
    #[serde(default)]
    pub role: Role,
    /// Phone number used as the login identifier.
    pub phone: String,
    /// Whether the account is active. Inactive accounts keep their data but
    /// cannot act.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let user: EdgeUser = serde_json::from_str(
            r#"{"id":"u1","role":"admin","phone":"03001234567","isActive":false}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.role, Role::Admin);
        assert!(!user.is_active);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        // Older backend responses omit role and isActive entirely.
        let user: EdgeUser = serde_json::from_str(r#"{"id":"u2","phone":"0300"}"#).unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(user.is_active);
    }
}
