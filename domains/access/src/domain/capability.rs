//! Role capability table
//!
//! Capabilities are org-level gates determined solely by organization
//! role, independent of bucket ACLs. The table is encoded explicitly per
//! role: the hierarchy is NOT linear (viewer lacks `bucket:write`, and
//! admin differs from owner only in `org:manage`, `org:delete` and
//! `member:change-role`), so deriving it from role ordering would be
//! wrong.

use serde::{Deserialize, Serialize};
use vfxsh_common::{Error, OrgRole};

/// Org-level capability, gated by organization role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "org:manage")]
    OrgManage,
    #[serde(rename = "org:delete")]
    OrgDelete,
    #[serde(rename = "bucket:read")]
    BucketRead,
    #[serde(rename = "bucket:write")]
    BucketWrite,
    #[serde(rename = "virtual-bucket:create")]
    VirtualBucketCreate,
    #[serde(rename = "virtual-bucket:delete")]
    VirtualBucketDelete,
    #[serde(rename = "provider:read")]
    ProviderRead,
    #[serde(rename = "acl:manage")]
    AclManage,
    #[serde(rename = "group:manage")]
    GroupManage,
    #[serde(rename = "member:invite")]
    MemberInvite,
    #[serde(rename = "member:remove")]
    MemberRemove,
    #[serde(rename = "member:change-role")]
    MemberChangeRole,
    #[serde(rename = "key:manage")]
    KeyManage,
    #[serde(rename = "key:own")]
    KeyOwn,
    #[serde(rename = "audit:read")]
    AuditRead,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::OrgManage => "org:manage",
            Capability::OrgDelete => "org:delete",
            Capability::BucketRead => "bucket:read",
            Capability::BucketWrite => "bucket:write",
            Capability::VirtualBucketCreate => "virtual-bucket:create",
            Capability::VirtualBucketDelete => "virtual-bucket:delete",
            Capability::ProviderRead => "provider:read",
            Capability::AclManage => "acl:manage",
            Capability::GroupManage => "group:manage",
            Capability::MemberInvite => "member:invite",
            Capability::MemberRemove => "member:remove",
            Capability::MemberChangeRole => "member:change-role",
            Capability::KeyManage => "key:manage",
            Capability::KeyOwn => "key:own",
            Capability::AuditRead => "audit:read",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability set for each role, enumerated in full.
///
/// Each role's slice is the complete set; nothing is inherited.
pub fn capabilities_of(role: OrgRole) -> &'static [Capability] {
    use Capability::*;

    match role {
        OrgRole::Viewer => &[BucketRead, ProviderRead, KeyOwn],
        OrgRole::Member => &[BucketRead, BucketWrite, ProviderRead, KeyOwn],
        OrgRole::Admin => &[
            BucketRead,
            BucketWrite,
            ProviderRead,
            KeyOwn,
            VirtualBucketCreate,
            VirtualBucketDelete,
            AclManage,
            GroupManage,
            MemberInvite,
            MemberRemove,
            KeyManage,
            AuditRead,
        ],
        OrgRole::Owner => &[
            BucketRead,
            BucketWrite,
            ProviderRead,
            KeyOwn,
            VirtualBucketCreate,
            VirtualBucketDelete,
            AclManage,
            GroupManage,
            MemberInvite,
            MemberRemove,
            KeyManage,
            AuditRead,
            OrgManage,
            OrgDelete,
            MemberChangeRole,
        ],
    }
}

/// Whether a role holds a capability
pub fn role_has(role: OrgRole, capability: Capability) -> bool {
    capabilities_of(role).contains(&capability)
}

/// Guard a handler on an org-level capability.
///
/// Returns `Forbidden` with reason `insufficient_role` when the caller's
/// role lacks the capability.
pub fn require_capability(role: OrgRole, capability: Capability) -> Result<(), Error> {
    if role_has(role, capability) {
        Ok(())
    } else {
        Err(Error::forbidden_on(
            "insufficient_role",
            capability.as_str(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn caps(role: OrgRole) -> HashSet<Capability> {
        capabilities_of(role).iter().copied().collect()
    }

    #[test]
    fn test_viewer_capabilities_exact() {
        let expected: HashSet<_> = [
            Capability::BucketRead,
            Capability::ProviderRead,
            Capability::KeyOwn,
        ]
        .into_iter()
        .collect();
        assert_eq!(caps(OrgRole::Viewer), expected);
    }

    #[test]
    fn test_member_capabilities_exact() {
        let expected: HashSet<_> = [
            Capability::BucketRead,
            Capability::BucketWrite,
            Capability::ProviderRead,
            Capability::KeyOwn,
        ]
        .into_iter()
        .collect();
        assert_eq!(caps(OrgRole::Member), expected);
    }

    #[test]
    fn test_admin_capabilities_exact() {
        let expected: HashSet<_> = [
            Capability::BucketRead,
            Capability::BucketWrite,
            Capability::ProviderRead,
            Capability::KeyOwn,
            Capability::VirtualBucketCreate,
            Capability::VirtualBucketDelete,
            Capability::AclManage,
            Capability::GroupManage,
            Capability::MemberInvite,
            Capability::MemberRemove,
            Capability::KeyManage,
            Capability::AuditRead,
        ]
        .into_iter()
        .collect();
        assert_eq!(caps(OrgRole::Admin), expected);
    }

    #[test]
    fn test_owner_capabilities_exact() {
        let mut expected = caps(OrgRole::Admin);
        expected.insert(Capability::OrgManage);
        expected.insert(Capability::OrgDelete);
        expected.insert(Capability::MemberChangeRole);
        assert_eq!(caps(OrgRole::Owner), expected);
    }

    #[test]
    fn test_hierarchy_is_not_linear() {
        // viewer lacks bucket:write that member has
        assert!(!role_has(OrgRole::Viewer, Capability::BucketWrite));
        assert!(role_has(OrgRole::Member, Capability::BucketWrite));
        // neither viewer nor member has group:manage
        assert!(!role_has(OrgRole::Member, Capability::GroupManage));
        // admin and owner differ only in the org-management trio
        assert!(!role_has(OrgRole::Admin, Capability::OrgManage));
        assert!(!role_has(OrgRole::Admin, Capability::OrgDelete));
        assert!(!role_has(OrgRole::Admin, Capability::MemberChangeRole));
    }

    #[test]
    fn test_require_capability_denies_with_reason() {
        let err = require_capability(OrgRole::Viewer, Capability::AclManage).unwrap_err();
        match err {
            Error::Forbidden { reason, resource } => {
                assert_eq!(reason, "insufficient_role");
                assert_eq!(resource.as_deref(), Some("acl:manage"));
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_capability_serde_namespaced() {
        assert_eq!(
            serde_json::to_string(&Capability::VirtualBucketCreate).unwrap(),
            "\"virtual-bucket:create\""
        );
        let c: Capability = serde_json::from_str("\"member:change-role\"").unwrap();
        assert_eq!(c, Capability::MemberChangeRole);
    }
}
