//! Authorization context for authenticated requests

use crate::types::AuthIdentity;
use uuid::Uuid;
use vfxsh_common::OrgRole;

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    pub fn is_platform_operator(&self) -> bool {
        self.user.is_platform_operator
    }
}

/// Resolved organization scope for an org-level request.
///
/// Built from the `x-organization-id` header plus the caller's membership
/// row. Its existence proves the caller is a member: requests without a
/// resolvable organization context never reach handlers.
#[derive(Debug, Clone, Copy)]
pub struct OrgContext {
    pub org_id: Uuid,
    pub role: OrgRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(platform: bool) -> AuthIdentity {
        AuthIdentity {
            id: Uuid::new_v4(),
            email: "td@studio.example".to_string(),
            name: Some("Pipeline TD".to_string()),
            is_platform_operator: platform,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_platform_operator_flag() {
        assert!(AuthContext::new(identity(true)).is_platform_operator());
        assert!(!AuthContext::new(identity(false)).is_platform_operator());
    }

    #[test]
    fn test_org_context_carries_role() {
        let ctx = OrgContext {
            org_id: Uuid::new_v4(),
            role: OrgRole::Viewer,
        };
        assert_eq!(ctx.role, OrgRole::Viewer);
    }
}
