//! ACL matrix handlers
//!
//! Matrices are visible to `acl:manage` holders only. The response is
//! sparse: absent keys mean no access, never a default.

use axum::{extract::State, Json};
use serde::Serialize;
use vfxsh_auth::OrgScoped;
use vfxsh_common::Result;

use crate::api::middleware::AccessState;
use crate::domain::capability::{require_capability, Capability};
use crate::domain::permission::AclMatrix;

#[derive(Debug, Serialize)]
pub struct MatrixResponse {
    pub acls: AclMatrix,
}

/// GET /v1/acls/users
pub async fn user_acl_matrix(
    State(state): State<AccessState>,
    scope: OrgScoped,
) -> Result<Json<MatrixResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    let acls = state.repos.user_acls.matrix(scope.org.org_id).await?;
    Ok(Json(MatrixResponse { acls }))
}

/// GET /v1/acls/groups
pub async fn group_acl_matrix(
    State(state): State<AccessState>,
    scope: OrgScoped,
) -> Result<Json<MatrixResponse>> {
    require_capability(scope.org.role, Capability::AclManage)?;

    let acls = state.repos.group_acls.matrix(scope.org.org_id).await?;
    Ok(Json(MatrixResponse { acls }))
}
