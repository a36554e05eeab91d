//! Pure access decision
//!
//! The decision is a function of the caller's org role, the requested
//! permission and the ACL grants loaded for (user, bucket). It never
//! errors for "no access": denial is a value, not an exception, so
//! callers can act on it without exception-based control flow.

use serde::{Deserialize, Serialize};
use vfxsh_common::OrgRole;

use super::capability::{role_has, Capability};
use super::permission::{effective_permission, AclPermission};

/// Reason code carried by a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The org role lacks the capability for this operation class
    InsufficientRole,
    /// The role allows the operation class, but the effective bucket
    /// permission is below the requested level
    InsufficientBucketAcl,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::InsufficientRole => "insufficient_role",
            DenyReason::InsufficientBucketAcl => "insufficient_bucket_acl",
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny { reason: DenyReason },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny { reason } => Some(*reason),
        }
    }
}

/// Org-level capability gating each operation class
fn required_capability(requested: AclPermission) -> Capability {
    match requested {
        AclPermission::Read => Capability::BucketRead,
        AclPermission::Write => Capability::BucketWrite,
        AclPermission::Admin => Capability::AclManage,
    }
}

/// Decide whether a user may perform an operation on a bucket.
///
/// The org capability gate is checked first and is necessary, not just
/// sufficient: a viewer with a direct `write` grant is still denied
/// `insufficient_role`. Only then is the effective bucket permission
/// (max of direct and group grants) compared against the request.
pub fn decide(
    role: OrgRole,
    requested: AclPermission,
    direct: Option<AclPermission>,
    group_grants: impl IntoIterator<Item = AclPermission>,
) -> AccessDecision {
    if !role_has(role, required_capability(requested)) {
        return AccessDecision::Deny {
            reason: DenyReason::InsufficientRole,
        };
    }

    let effective = effective_permission(direct, group_grants);
    if effective >= Some(requested) {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny {
            reason: DenyReason::InsufficientBucketAcl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_grant_allows() {
        let d = decide(
            OrgRole::Member,
            AclPermission::Read,
            Some(AclPermission::Read),
            vec![],
        );
        assert_eq!(d, AccessDecision::Allow);
    }

    #[test]
    fn test_admin_grant_implies_write_and_read() {
        for requested in [AclPermission::Read, AclPermission::Write] {
            let d = decide(
                OrgRole::Member,
                requested,
                Some(AclPermission::Admin),
                vec![],
            );
            assert_eq!(d, AccessDecision::Allow, "requested {:?}", requested);
        }
    }

    #[test]
    fn test_viewer_with_direct_write_denied_insufficient_role() {
        // Org capability gate comes first: viewer lacks bucket:write even
        // though the bucket ACL would allow it.
        let d = decide(
            OrgRole::Viewer,
            AclPermission::Write,
            Some(AclPermission::Write),
            vec![],
        );
        assert_eq!(
            d,
            AccessDecision::Deny {
                reason: DenyReason::InsufficientRole
            }
        );
    }

    #[test]
    fn test_member_with_group_read_denied_write_on_acl() {
        // member holds bucket:write at the org level, but the effective
        // permission through the group is only read.
        let d = decide(
            OrgRole::Member,
            AclPermission::Write,
            None,
            vec![AclPermission::Read],
        );
        assert_eq!(
            d,
            AccessDecision::Deny {
                reason: DenyReason::InsufficientBucketAcl
            }
        );
    }

    #[test]
    fn test_group_grant_raises_effective_permission() {
        let d = decide(
            OrgRole::Member,
            AclPermission::Write,
            Some(AclPermission::Read),
            vec![AclPermission::Write],
        );
        assert_eq!(d, AccessDecision::Allow);
    }

    #[test]
    fn test_no_grants_denied_on_acl() {
        let d = decide(OrgRole::Owner, AclPermission::Read, None, vec![]);
        assert_eq!(
            d,
            AccessDecision::Deny {
                reason: DenyReason::InsufficientBucketAcl
            }
        );
    }

    #[test]
    fn test_deny_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DenyReason::InsufficientBucketAcl).unwrap(),
            "\"insufficient_bucket_acl\""
        );
    }
}
