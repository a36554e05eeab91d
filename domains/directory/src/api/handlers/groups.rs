//! Group handlers
//!
//! Groups are addressed by their immutable slug. Listing is open to any
//! member; mutations require `group:manage`. Deleting a group cascades
//! its membership edges and ACL grants in one transaction.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_access::domain::capability::{require_capability, Capability};
use vfxsh_access::repository::AclEntry;
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Error, Result, ValidatedJson};

use crate::api::middleware::DirectoryState;
use crate::domain::entities::{Group, GroupMember};
use crate::repository::groups::GroupRecord;
use crate::repository::transactions::delete_group_tx;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Immutable slug identifier, e.g. `render-wranglers`
    #[validate(length(min = 1, max = 63))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddGroupMemberRequest {
    pub user_id: Uuid,
}

/// Group detail: the group, its members and its bucket grants
#[derive(Debug, Serialize)]
pub struct GroupDetailResponse {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<GroupMember>,
    pub access: Vec<AclEntry>,
}

/// GET /v1/groups
pub async fn list_groups(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
) -> Result<Json<Vec<GroupRecord>>> {
    let groups = state.repos.groups.list(scope.org.org_id).await?;
    Ok(Json(groups))
}

/// POST /v1/groups
pub async fn create_group(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> Result<Json<Group>> {
    require_capability(scope.org.role, Capability::GroupManage)?;

    let group = Group::new(scope.org.org_id, request.id, request.name, request.description)?;
    let created = state.repos.groups.create(&group).await.map_err(|e| match e {
        vfxsh_common::db::RepositoryError::AlreadyExists => {
            Error::conflict_on("A group with this slug already exists", group.id.clone())
        }
        other => other.into(),
    })?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "group:create",
            "group",
            created.id.clone(),
        ))
        .await;

    Ok(Json(created))
}

/// GET /v1/groups/{id}
pub async fn get_group(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetailResponse>> {
    let group = state
        .repos
        .groups
        .get(scope.org.org_id, &group_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Group {} not found", group_id)))?;

    let members = state
        .repos
        .groups
        .list_members(scope.org.org_id, &group_id)
        .await?;
    let access = state
        .group_acls
        .list_for_group(scope.org.org_id, &group_id)
        .await?;

    Ok(Json(GroupDetailResponse {
        group,
        members,
        access,
    }))
}

/// PUT /v1/groups/{id}
pub async fn update_group(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(group_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateGroupRequest>,
) -> Result<Json<Group>> {
    require_capability(scope.org.role, Capability::GroupManage)?;

    let group = state
        .repos
        .groups
        .update(
            scope.org.org_id,
            &group_id,
            request.name.as_deref(),
            request.description.as_deref(),
        )
        .await?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "group:update",
            "group",
            group_id,
        ))
        .await;

    Ok(Json(group))
}

/// DELETE /v1/groups/{id}
pub async fn delete_group(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(group_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    require_capability(scope.org.role, Capability::GroupManage)?;

    let mut tx = state.repos.begin().await?;
    delete_group_tx(&mut tx, scope.org.org_id, &group_id).await?;
    tx.commit()
        .await
        .map_err(vfxsh_common::db::RepositoryError::Connection)?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "group:delete",
            "group",
            group_id.clone(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": group_id })))
}

/// POST /v1/groups/{id}/members
pub async fn add_group_member(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(group_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AddGroupMemberRequest>,
) -> Result<Json<Vec<GroupMember>>> {
    require_capability(scope.org.role, Capability::GroupManage)?;

    // Only org members can be placed in the org's groups
    state
        .repos
        .memberships
        .find(scope.org.org_id, request.user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {} is not a member", request.user_id)))?;

    match state
        .repos
        .groups
        .add_member(scope.org.org_id, &group_id, request.user_id)
        .await
    {
        // A duplicate edge is a no-op, not an error
        Ok(()) | Err(vfxsh_common::db::RepositoryError::AlreadyExists) => {}
        Err(e) => return Err(e.into()),
    }

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "group:add-member",
                "group",
                group_id.clone(),
            )
            .with_details(serde_json::json!({ "user_id": request.user_id })),
        )
        .await;

    let members = state
        .repos
        .groups
        .list_members(scope.org.org_id, &group_id)
        .await?;
    Ok(Json(members))
}

/// DELETE /v1/groups/{id}/members/{user_id}
pub async fn remove_group_member(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path((group_id, user_id)): Path<(String, Uuid)>,
) -> Result<Json<Vec<GroupMember>>> {
    require_capability(scope.org.role, Capability::GroupManage)?;

    state
        .repos
        .groups
        .remove_member(scope.org.org_id, &group_id, user_id)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "group:remove-member",
                "group",
                group_id.clone(),
            )
            .with_details(serde_json::json!({ "user_id": user_id })),
        )
        .await;

    let members = state
        .repos
        .groups
        .list_members(scope.org.org_id, &group_id)
        .await?;
    Ok(Json(members))
}
