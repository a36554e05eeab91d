//! Organization member handlers
//!
//! Role changes and removals run the last-owner guard inside a
//! transaction: an organization must always retain at least one owner.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use vfxsh_access::domain::capability::{require_capability, Capability};
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Error, OrgRole, Result, ValidatedJson};

use crate::api::middleware::DirectoryState;
use crate::domain::entities::{MemberRecord, Membership};
use crate::domain::ownership::leaves_org_ownerless;
use crate::repository::transactions::{
    count_owners_tx, membership_role_tx, remove_membership_tx, update_membership_role_tx,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub role: OrgRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: OrgRole,
}

/// GET /v1/organization/members
pub async fn list_members(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
) -> Result<Json<Vec<MemberRecord>>> {
    let members = state.repos.memberships.list_members(scope.org.org_id).await?;
    Ok(Json(members))
}

/// POST /v1/organization/members
///
/// Adds an existing user to the organization by email. Granting the
/// owner role is itself a role-change operation.
pub async fn add_member(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    ValidatedJson(request): ValidatedJson<AddMemberRequest>,
) -> Result<Json<Membership>> {
    require_capability(scope.org.role, Capability::MemberInvite)?;
    if request.role == OrgRole::Owner {
        require_capability(scope.org.role, Capability::MemberChangeRole)?;
    }

    let user = state
        .repos
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No user with email {}", request.email)))?;

    let membership = state
        .repos
        .memberships
        .add_member(scope.org.org_id, user.id, request.role)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "member:add",
                "membership",
                user.id.to_string(),
            )
            .with_details(serde_json::json!({ "role": request.role })),
        )
        .await;

    Ok(Json(membership))
}

/// PUT /v1/organization/members/{user_id}
pub async fn change_member_role(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> Result<Json<Membership>> {
    require_capability(scope.org.role, Capability::MemberChangeRole)?;

    let mut tx = state.repos.begin().await?;
    let current = membership_role_tx(&mut tx, scope.org.org_id, user_id)
        .await
        .map_err(vfxsh_common::db::RepositoryError::Connection)?
        .ok_or_else(|| Error::NotFound(format!("User {} is not a member", user_id)))?;

    if current == OrgRole::Owner {
        let owners = count_owners_tx(&mut tx, scope.org.org_id)
            .await
            .map_err(vfxsh_common::db::RepositoryError::Connection)?;
        if leaves_org_ownerless(current, Some(request.role), owners) {
            return Err(Error::conflict_on(
                "Cannot demote the organization's only owner",
                user_id.to_string(),
            ));
        }
    }

    update_membership_role_tx(&mut tx, scope.org.org_id, user_id, request.role).await?;
    tx.commit()
        .await
        .map_err(vfxsh_common::db::RepositoryError::Connection)?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "member:change-role",
                "membership",
                user_id.to_string(),
            )
            .with_details(serde_json::json!({ "from": current, "to": request.role })),
        )
        .await;

    let membership = state
        .repos
        .memberships
        .find(scope.org.org_id, user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {} is not a member", user_id)))?;
    Ok(Json(membership))
}

/// DELETE /v1/organization/members/{user_id}
///
/// Members may remove themselves (leave); removing anyone else requires
/// `member:remove`. Either way, removing the last owner is rejected.
pub async fn remove_member(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    if user_id != scope.auth.user.id {
        require_capability(scope.org.role, Capability::MemberRemove)?;
    }

    let mut tx = state.repos.begin().await?;
    let current = membership_role_tx(&mut tx, scope.org.org_id, user_id)
        .await
        .map_err(vfxsh_common::db::RepositoryError::Connection)?
        .ok_or_else(|| Error::NotFound(format!("User {} is not a member", user_id)))?;

    if current == OrgRole::Owner {
        let owners = count_owners_tx(&mut tx, scope.org.org_id)
            .await
            .map_err(vfxsh_common::db::RepositoryError::Connection)?;
        if leaves_org_ownerless(current, None, owners) {
            return Err(Error::conflict_on(
                "Cannot remove the organization's only owner",
                user_id.to_string(),
            ));
        }
    }

    remove_membership_tx(&mut tx, scope.org.org_id, user_id).await?;
    tx.commit()
        .await
        .map_err(vfxsh_common::db::RepositoryError::Connection)?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "member:remove",
            "membership",
            user_id.to_string(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "removed": user_id })))
}
