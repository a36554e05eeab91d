//! Platform-level handlers (cross-tenant, operator-only)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::PlatformOperator;
use vfxsh_common::{Error, Result, ValidatedJson};

use crate::api::middleware::DirectoryState;
use crate::domain::entities::{Organization, User};
use crate::repository::organizations::PlatformOrgRecord;
use crate::repository::users::PlatformUserRecord;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub is_platform_operator: bool,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[serde(default)]
    pub is_platform_operator: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    pub is_platform_operator: Option<bool>,
}

/// GET /v1/platform/status
///
/// Reaching this handler proves operator status; non-operators get 403
/// from the extractor.
pub async fn status(operator: PlatformOperator) -> Json<StatusResponse> {
    Json(StatusResponse {
        is_platform_operator: true,
        email: operator.0.user.email,
    })
}

/// GET /v1/platform/organizations
pub async fn list_organizations(
    State(state): State<DirectoryState>,
    _operator: PlatformOperator,
) -> Result<Json<Vec<PlatformOrgRecord>>> {
    let orgs = state.repos.organizations.list_platform().await?;
    Ok(Json(orgs))
}

/// POST /v1/platform/organizations
pub async fn create_organization(
    State(state): State<DirectoryState>,
    operator: PlatformOperator,
    ValidatedJson(request): ValidatedJson<CreateOrganizationRequest>,
) -> Result<Json<Organization>> {
    let org = state
        .repos
        .organizations
        .create(&request.name)
        .await
        .map_err(|e| match e {
            vfxsh_common::db::RepositoryError::AlreadyExists => {
                Error::conflict_on("An organization with this name already exists", request.name.clone())
            }
            other => other.into(),
        })?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            operator.0.user.id,
            operator.0.user.email.clone(),
            "org:create",
            "organization",
            org.id.to_string(),
        ))
        .await;

    Ok(Json(org))
}

/// DELETE /v1/platform/organizations/{id}
pub async fn delete_organization(
    State(state): State<DirectoryState>,
    operator: PlatformOperator,
    Path(org_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.repos.organizations.delete(org_id).await?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            operator.0.user.id,
            operator.0.user.email.clone(),
            "org:delete",
            "organization",
            org_id.to_string(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": org_id })))
}

/// GET /v1/platform/users
pub async fn list_users(
    State(state): State<DirectoryState>,
    _operator: PlatformOperator,
) -> Result<Json<Vec<PlatformUserRecord>>> {
    let users = state.repos.users.list_platform().await?;
    Ok(Json(users))
}

/// POST /v1/platform/users — pre-provision a user by email
pub async fn create_user(
    State(state): State<DirectoryState>,
    operator: PlatformOperator,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<Json<User>> {
    let user = state
        .repos
        .users
        .create(&request.email, request.name.as_deref(), request.is_platform_operator)
        .await
        .map_err(|e| match e {
            vfxsh_common::db::RepositoryError::AlreadyExists => {
                Error::conflict_on("A user with this email already exists", request.email.clone())
            }
            other => other.into(),
        })?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            operator.0.user.id,
            operator.0.user.email.clone(),
            "user:create",
            "user",
            user.id.to_string(),
        ))
        .await;

    Ok(Json(user))
}

/// PUT /v1/platform/users/{id}
pub async fn update_user(
    State(state): State<DirectoryState>,
    operator: PlatformOperator,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<User>> {
    let user = state
        .repos
        .users
        .update_platform(user_id, request.name.as_deref(), request.is_platform_operator)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::platform_action(
                operator.0.user.id,
                operator.0.user.email.clone(),
                "user:update",
                "user",
                user_id.to_string(),
            )
            .with_details(serde_json::json!({
                "is_platform_operator": request.is_platform_operator,
            })),
        )
        .await;

    Ok(Json(user))
}
