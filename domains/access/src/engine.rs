//! Async access decision engine
//!
//! Loads the ACL inputs for (user, bucket) from Postgres and delegates
//! to the pure [`decide`] function. Denial is a value; this only returns
//! `Err` for infrastructure failures.

use uuid::Uuid;
use vfxsh_common::{OrgRole, Result};

use crate::domain::decision::{decide, AccessDecision};
use crate::domain::permission::{effective_permission, AclPermission};
use crate::repository::{GroupAclRepository, UserAclRepository};

#[derive(Clone)]
pub struct AccessDecisionEngine {
    user_acls: UserAclRepository,
    group_acls: GroupAclRepository,
}

impl AccessDecisionEngine {
    pub fn new(user_acls: UserAclRepository, group_acls: GroupAclRepository) -> Self {
        Self {
            user_acls,
            group_acls,
        }
    }

    /// Decide whether `user_id` (holding `role` in `org_id`) may perform
    /// an operation requiring `requested` on `bucket_name`.
    pub async fn authorize(
        &self,
        org_id: Uuid,
        role: OrgRole,
        user_id: Uuid,
        bucket_name: &str,
        requested: AclPermission,
    ) -> Result<AccessDecision> {
        let direct = self
            .user_acls
            .direct_permission(org_id, user_id, bucket_name)
            .await?;
        let group_grants = self
            .group_acls
            .grants_for_user(org_id, user_id, bucket_name)
            .await?;

        let decision = decide(role, requested, direct, group_grants);
        if let AccessDecision::Deny { reason } = decision {
            tracing::debug!(
                %org_id,
                %user_id,
                bucket = bucket_name,
                requested = %requested,
                reason = reason.as_str(),
                "Access denied"
            );
        }
        Ok(decision)
    }

    /// Effective permission for (user, bucket): max of the direct grant
    /// and all group grants, `None` when no grant exists.
    pub async fn effective(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        bucket_name: &str,
    ) -> Result<Option<AclPermission>> {
        let direct = self
            .user_acls
            .direct_permission(org_id, user_id, bucket_name)
            .await?;
        let group_grants = self
            .group_acls
            .grants_for_user(org_id, user_id, bucket_name)
            .await?;

        Ok(effective_permission(direct, group_grants))
    }
}
