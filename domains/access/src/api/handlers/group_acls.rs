//! Per-group ACL handlers
//!
//! Same single-entry upsert/remove style as the user endpoints. Groups
//! are addressed by slug.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Result, ValidatedJson};

use super::user_acls::SetAccessRequest;
use crate::api::middleware::AccessState;
use crate::domain::capability::{require_capability, Capability};
use crate::repository::AclEntry;

#[derive(Debug, Serialize)]
pub struct GroupAclResponse {
    pub group_id: String,
    pub entries: Vec<AclEntry>,
}

/// POST /v1/groups/{id}/access
pub async fn set_group_access(
    State(state): State<AccessState>,
    scope: OrgScoped,
    Path(group_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetAccessRequest>,
) -> Result<Json<GroupAclResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    let (action, details) = match request.permission {
        Some(permission) => {
            state
                .repos
                .group_acls
                .upsert(scope.org.org_id, &group_id, &request.bucket_name, permission)
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
                .group_acls
                .remove(scope.org.org_id, &group_id, &request.bucket_name)
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
                "group_acl",
                group_id.clone(),
            )
            .with_details(details),
        )
        .await;

    let entries = state
        .repos
        .group_acls
        .list_for_group(scope.org.org_id, &group_id)
        .await?;
    Ok(Json(GroupAclResponse { group_id, entries }))
}

/// DELETE /v1/groups/{id}/access/{bucket}
pub async fn remove_group_access(
    State(state): State<AccessState>,
    scope: OrgScoped,
    Path((group_id, bucket_name)): Path<(String, String)>,
) -> Result<Json<GroupAclResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    state
        .repos
        .group_acls
        .remove(scope.org.org_id, &group_id, &bucket_name)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "acl:remove",
                "group_acl",
                group_id.clone(),
            )
            .with_details(serde_json::json!({ "bucket_name": bucket_name })),
        )
        .await;

    let entries = state
        .repos
        .group_acls
        .list_for_group(scope.org.org_id, &group_id)
        .await?;
    Ok(Json(GroupAclResponse { group_id, entries }))
}
