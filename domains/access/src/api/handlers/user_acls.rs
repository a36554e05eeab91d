//! Per-user ACL handlers
//!
//! `acl:manage` holders may mutate ACLs without themselves holding any
//! bucket access (administrative bypass). The single-entry upsert/remove
//! endpoints are the normalized style; the full-replace PUT remains for
//! console compatibility and runs as one transaction.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Result, ValidatedJson};

use crate::api::middleware::AccessState;
use crate::domain::capability::{require_capability, Capability};
use crate::domain::permission::{permission_or_none, AclPermission};
use crate::repository::AclEntry;

#[derive(Debug, Deserialize, Validate)]
pub struct SetAccessRequest {
    #[validate(length(min = 3, max = 63))]
    pub bucket_name: String,
    /// `"none"` or null clears the grant
    #[serde(default, deserialize_with = "permission_or_none")]
    pub permission: Option<AclPermission>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AclEntryInput {
    #[validate(length(min = 3, max = 63))]
    pub bucket_name: String,
    pub permission: AclPermission,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceAclRequest {
    #[validate(nested)]
    pub entries: Vec<AclEntryInput>,
}

#[derive(Debug, Serialize)]
pub struct UserAclResponse {
    pub user_id: Uuid,
    pub entries: Vec<AclEntry>,
}

/// GET /v1/users/{id}/acl
pub async fn get_user_acl(
    State(state): State<AccessState>,
    scope: OrgScoped,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserAclResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    let entries = state
        .repos
        .user_acls
        .list_for_user(scope.org.org_id, user_id)
        .await?;
    Ok(Json(UserAclResponse { user_id, entries }))
}

/// PUT /v1/users/{id}/acl — transactional replace-all
pub async fn replace_user_acl(
    State(state): State<AccessState>,
    scope: OrgScoped,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ReplaceAclRequest>,
) -> Result<Json<UserAclResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    let entries: Vec<(String, AclPermission)> = request
        .entries
        .into_iter()
        .map(|e| (e.bucket_name, e.permission))
        .collect();
    state
        .repos
        .user_acls
        .replace_for_user(scope.org.org_id, user_id, &entries)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "acl:replace",
                "user_acl",
                user_id.to_string(),
            )
            .with_details(serde_json::json!({ "entry_count": entries.len() })),
        )
        .await;

    let entries = state
        .repos
        .user_acls
        .list_for_user(scope.org.org_id, user_id)
        .await?;
    Ok(Json(UserAclResponse { user_id, entries }))
}

/// POST /v1/users/{id}/access — single-entry upsert (or removal via
/// permission "none")
pub async fn set_user_access(
    State(state): State<AccessState>,
    scope: OrgScoped,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SetAccessRequest>,
) -> Result<Json<UserAclResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    let (action, details) = match request.permission {
        Some(permission) => {
            state
                .repos
                .user_acls
                .upsert(scope.org.org_id, user_id, &request.bucket_name, permission)
                .await?;
            (
                "acl:set",
                serde_json::json!({
                    "bucket_name": request.bucket_name,
                    "permission": permission,
                }),
            )
        }
        None => {
            state
                .repos
                .user_acls
                .remove(scope.org.org_id, user_id, &request.bucket_name)
                .await?;
            (
                "acl:remove",
                serde_json::json!({ "bucket_name": request.bucket_name }),
            )
        }
    };

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                action,
                "user_acl",
                user_id.to_string(),
            )
            .with_details(details),
        )
        .await;

    let entries = state
        .repos
        .user_acls
        .list_for_user(scope.org.org_id, user_id)
        .await?;
    Ok(Json(UserAclResponse { user_id, entries }))
}

/// DELETE /v1/users/{id}/access/{bucket}
pub async fn remove_user_access(
    State(state): State<AccessState>,
    scope: OrgScoped,
    Path((user_id, bucket_name)): Path<(Uuid, String)>,
) -> Result<Json<UserAclResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    state
        .repos
        .user_acls
        .remove(scope.org.org_id, user_id, &bucket_name)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "acl:remove",
                "user_acl",
                user_id.to_string(),
            )
            .with_details(serde_json::json!({ "bucket_name": bucket_name })),
        )
        .await;

    let entries = state
        .repos
        .user_acls
        .list_for_user(scope.org.org_id, user_id)
        .await?;
    Ok(Json(UserAclResponse { user_id, entries }))
}
