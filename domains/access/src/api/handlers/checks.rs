//! Access decision introspection

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Result, ValidatedJson};

use crate::api::middleware::AccessState;
use crate::domain::capability::{require_capability, Capability};
use crate::domain::decision::DenyReason;
use crate::domain::permission::AclPermission;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckAccessRequest {
    /// Defaults to the caller; checking another user requires `acl:manage`
    pub user_id: Option<Uuid>,
    #[validate(length(min = 3, max = 63))]
    pub bucket_name: String,
    pub permission: AclPermission,
}

#[derive(Debug, Serialize)]
pub struct CheckAccessResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
    pub effective_permission: Option<AclPermission>,
}

/// POST /v1/access/check
///
/// Returns the decision as data, never as an error: a denied check is a
/// 200 with `allowed: false` and a reason code.
pub async fn check_access(
    State(state): State<AccessState>,
    scope: OrgScoped,
    ValidatedJson(request): ValidatedJson<CheckAccessRequest>,
) -> Result<Json<CheckAccessResponse>> {
    let subject = request.user_id.unwrap_or(scope.auth.user.id);
    let subject_role = if subject == scope.auth.user.id {
        scope.org.role
    } else {
        // Checking someone else is itself an administrative operation,
        // and the decision must use the subject's role, not the caller's.
        require_capability(scope.org.role, Capability::AclManage)?;
        state
            .auth
            .resolve_membership(subject, scope.org.org_id)
            .await
            .map_err(|_| vfxsh_common::Error::Internal("membership lookup failed".into()))?
            .ok_or_else(|| {
                vfxsh_common::Error::NotFound(format!("user {} is not a member", subject))
            })?
            .role
    };

    let decision = state
        .engine
        .authorize(
            scope.org.org_id,
            subject_role,
            subject,
            &request.bucket_name,
            request.permission,
        )
        .await?;
    let effective = state
        .engine
        .effective(scope.org.org_id, subject, &request.bucket_name)
        .await?;

    Ok(Json(CheckAccessResponse {
        allowed: decision.is_allowed(),
        reason: decision.deny_reason(),
        effective_permission: effective,
    }))
}
