//! Bucket permission levels and effective-permission resolution
//!
//! ACL matrices are sparse: the absence of an entry means no access.
//! `None` is therefore represented by absence (`Option<AclPermission>`),
//! never stored as a row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Permission level stored in a user or group ACL entry.
///
/// Variant order is the permission ordering: `Admin > Write > Read`.
/// An `Option<AclPermission>` compares with `None` below `Some(Read)`,
/// which is exactly the "none as identity" rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "acl_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AclPermission {
    Read,
    Write,
    Admin,
}

impl AclPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            AclPermission::Read => "read",
            AclPermission::Write => "write",
            AclPermission::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AclPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AclPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(AclPermission::Read),
            "write" => Ok(AclPermission::Write),
            "admin" => Ok(AclPermission::Admin),
            other => Err(format!("unknown permission level: {}", other)),
        }
    }
}

/// Sparse ACL matrix: entity id -> bucket name -> permission.
///
/// Absent keys mean no access; there is no default.
pub type AclMatrix = BTreeMap<String, BTreeMap<String, AclPermission>>;

/// Highest permission among a direct grant and any group grants.
///
/// `None` when the user has no grant at all, direct or inherited.
pub fn effective_permission(
    direct: Option<AclPermission>,
    group_grants: impl IntoIterator<Item = AclPermission>,
) -> Option<AclPermission> {
    group_grants
        .into_iter()
        .map(Some)
        .fold(direct, std::cmp::max)
}

/// Deserializes `"none"` (or JSON null, or an absent field) as `None`.
///
/// The console sends `"none"` to clear a grant; the sparse-matrix model
/// treats that as removal, not as a stored level.
pub fn permission_or_none<'de, D>(deserializer: D) -> Result<Option<AclPermission>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Level(AclPermission),
        Other(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Level(p)) => Ok(Some(p)),
        Some(Raw::Other(s)) if s == "none" => Ok(None),
        Some(Raw::Other(s)) => Err(serde::de::Error::custom(format!(
            "unknown permission level: {}",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_ordering() {
        assert!(AclPermission::Admin > AclPermission::Write);
        assert!(AclPermission::Write > AclPermission::Read);
        // None is the identity / minimum
        assert!(Some(AclPermission::Read) > None::<AclPermission>);
    }

    #[test]
    fn test_effective_permission_is_max_over_grants() {
        assert_eq!(
            effective_permission(
                Some(AclPermission::Read),
                vec![AclPermission::Write, AclPermission::Read]
            ),
            Some(AclPermission::Write)
        );
        assert_eq!(
            effective_permission(Some(AclPermission::Admin), vec![AclPermission::Read]),
            Some(AclPermission::Admin)
        );
    }

    #[test]
    fn test_effective_permission_none_identity() {
        assert_eq!(effective_permission(None, vec![]), None);
        assert_eq!(
            effective_permission(None, vec![AclPermission::Read]),
            Some(AclPermission::Read)
        );
        assert_eq!(
            effective_permission(Some(AclPermission::Read), vec![]),
            Some(AclPermission::Read)
        );
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&AclPermission::Write).unwrap(),
            "\"write\""
        );
        let p: AclPermission = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(p, AclPermission::Admin);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("superuser".parse::<AclPermission>().is_err());
        assert!("none".parse::<AclPermission>().is_err());
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "permission_or_none")]
        permission: Option<AclPermission>,
    }

    #[test]
    fn test_permission_or_none_accepts_none_string() {
        let b: Body = serde_json::from_str(r#"{"permission": "none"}"#).unwrap();
        assert_eq!(b.permission, None);
        let b: Body = serde_json::from_str(r#"{"permission": null}"#).unwrap();
        assert_eq!(b.permission, None);
        let b: Body = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(b.permission, None);
        let b: Body = serde_json::from_str(r#"{"permission": "write"}"#).unwrap();
        assert_eq!(b.permission, Some(AclPermission::Write));
    }

    #[test]
    fn test_permission_or_none_rejects_garbage() {
        assert!(serde_json::from_str::<Body>(r#"{"permission": "all"}"#).is_err());
    }
}
