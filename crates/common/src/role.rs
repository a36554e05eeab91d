//! Canonical organization role enum.
//!
//! The role is the sole source of org-level capabilities. It is a closed
//! enum: unknown role strings are rejected at the serde/sqlx boundary
//! instead of being carried around as bare strings.

use serde::{Deserialize, Serialize};

/// Role a user holds within one organization.
///
/// A user has at most one role per organization. Some deployments collapse
/// `Admin` into `Owner`; both are always representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "org_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

impl std::fmt::Display for OrgRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrgRole::Owner => write!(f, "owner"),
            OrgRole::Admin => write!(f, "admin"),
            OrgRole::Member => write!(f, "member"),
            OrgRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "owner" => Ok(OrgRole::Owner),
            "admin" => Ok(OrgRole::Admin),
            "member" => Ok(OrgRole::Member),
            "viewer" => Ok(OrgRole::Viewer),
            other => Err(format!("unknown organization role: {}", other)),
        }
    }
}

impl OrgRole {
    /// Check if this role is owner
    pub fn is_owner(&self) -> bool {
        matches!(self, OrgRole::Owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [
            OrgRole::Owner,
            OrgRole::Admin,
            OrgRole::Member,
            OrgRole::Viewer,
        ] {
            let parsed = OrgRole::from_str(&role.to_string()).unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!(OrgRole::from_str("superadmin").is_err());
        assert!(OrgRole::from_str("Owner").is_err()); // case sensitive
        assert!(OrgRole::from_str("").is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&OrgRole::Viewer).unwrap();
        assert_eq!(json, "\"viewer\"");
        let back: OrgRole = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(back, OrgRole::Owner);
    }

    #[test]
    fn test_role_serde_rejects_unknown() {
        let result: std::result::Result<OrgRole, _> = serde_json::from_str("\"root\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_is_owner() {
        assert!(OrgRole::Owner.is_owner());
        assert!(!OrgRole::Admin.is_owner());
        assert!(!OrgRole::Member.is_owner());
        assert!(!OrgRole::Viewer.is_owner());
    }
}
