//! Platform operator handlers for providers, cross-org buckets,
//! assignments, and gateway lock visibility.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::PlatformOperator;
use vfxsh_common::{Error, Result, ValidatedJson};

use crate::api::middleware::StorageState;
use crate::domain::entities::{
    Bucket, BucketOrgAssignment, BucketType, Provider, ProviderSummary,
};
use crate::gateway::FileLock;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProviderRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(url)]
    pub endpoint_url: String,
    pub region: Option<String>,
    #[validate(length(min = 1))]
    pub access_key_id: String,
    #[validate(length(min = 1))]
    pub secret_access_key: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProviderRequest {
    pub name: Option<String>,
    #[validate(url)]
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlatformBucketRequest {
    pub org_id: Uuid,
    #[validate(length(min = 3, max = 63))]
    pub bucket_name: String,
    pub bucket_type: BucketType,
    pub provider_id: Option<Uuid>,
    pub remote_bucket_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 3, max = 63))]
    pub bucket_name: String,
    pub org_id: Uuid,
}

/// Lock listing degrades rather than fails: when the gateway is
/// unreachable the response carries `available: false` and no locks.
#[derive(Debug, Serialize)]
pub struct LocksResponse {
    pub locks: Vec<FileLock>,
    pub available: bool,
}

/// GET /v1/platform/providers
pub async fn list_providers(
    State(state): State<StorageState>,
    _operator: PlatformOperator,
) -> Result<Json<Vec<ProviderSummary>>> {
    let providers = state.repos.providers.list_summaries().await?;
    Ok(Json(providers))
}

/// POST /v1/platform/providers
pub async fn create_provider(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    ValidatedJson(request): ValidatedJson<CreateProviderRequest>,
) -> Result<Json<ProviderSummary>> {
    let provider = Provider {
        id: Uuid::new_v4(),
        name: request.name,
        endpoint_url: request.endpoint_url,
        region: request.region,
        access_key_id: request.access_key_id,
        secret_access_key: request.secret_access_key,
        enabled: true,
        created_at: Utc::now(),
    };

    let created = state.repos.providers.create(&provider).await.map_err(|e| {
        match e {
            vfxsh_common::db::RepositoryError::AlreadyExists => Error::conflict_on(
                "A provider with this name already exists",
                provider.name.clone(),
            ),
            other => other.into(),
        }
    })?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            auth.user.id,
            auth.user.email.clone(),
            "provider:create",
            "provider",
            created.id.to_string(),
        ))
        .await;

    Ok(Json(created))
}

/// PUT /v1/platform/providers/{id}
pub async fn update_provider(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProviderRequest>,
) -> Result<Json<ProviderSummary>> {
    let updated = state
        .repos
        .providers
        .update(
            id,
            request.name.as_deref(),
            request.endpoint_url.as_deref(),
            request.region.as_deref(),
            request.access_key_id.as_deref(),
            request.secret_access_key.as_deref(),
            request.enabled,
        )
        .await?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            auth.user.id,
            auth.user.email.clone(),
            "provider:update",
            "provider",
            id.to_string(),
        ))
        .await;

    Ok(Json(updated))
}

/// DELETE /v1/platform/providers/{id}
///
/// A provider still referenced by buckets cannot be deleted.
pub async fn delete_provider(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.repos.providers.delete(id).await?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            auth.user.id,
            auth.user.email.clone(),
            "provider:delete",
            "provider",
            id.to_string(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// GET /v1/platform/buckets
pub async fn list_buckets(
    State(state): State<StorageState>,
    _operator: PlatformOperator,
) -> Result<Json<Vec<Bucket>>> {
    let buckets = state.repos.buckets.list_platform().await?;
    Ok(Json(buckets))
}

/// POST /v1/platform/buckets
pub async fn create_bucket(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    ValidatedJson(request): ValidatedJson<CreatePlatformBucketRequest>,
) -> Result<Json<Bucket>> {
    let bucket = match request.bucket_type {
        BucketType::Virtual => Bucket::new_virtual(request.org_id, request.bucket_name)?,
        BucketType::Standard => {
            let provider_id = request.provider_id.ok_or_else(|| {
                Error::Validation("provider_id is required for standard buckets".to_string())
            })?;
            let remote = request.remote_bucket_name.ok_or_else(|| {
                Error::Validation(
                    "remote_bucket_name is required for standard buckets".to_string(),
                )
            })?;
            Bucket::standard(request.org_id, request.bucket_name, provider_id, remote)?
        }
    };

    let created = state.repos.buckets.create(&bucket).await.map_err(|e| match e {
        vfxsh_common::db::RepositoryError::AlreadyExists => Error::conflict_on(
            "A bucket with this name already exists in the organization",
            bucket.bucket_name.clone(),
        ),
        vfxsh_common::db::RepositoryError::NotFound => {
            Error::NotFound("Organization or provider not found".to_string())
        }
        other => other.into(),
    })?;

    state
        .audit
        .record(
            NewAuditEntry::platform_action(
                auth.user.id,
                auth.user.email.clone(),
                "bucket:create",
                "bucket",
                created.bucket_name.clone(),
            )
            .with_details(serde_json::json!({ "org_id": created.org_id })),
        )
        .await;

    Ok(Json(created))
}

/// DELETE /v1/platform/buckets/{org_id}/{name}
pub async fn delete_bucket(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    Path((org_id, bucket_name)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>> {
    state.repos.buckets.delete(org_id, &bucket_name).await?;

    state
        .audit
        .record(
            NewAuditEntry::platform_action(
                auth.user.id,
                auth.user.email.clone(),
                "bucket:delete",
                "bucket",
                bucket_name.clone(),
            )
            .with_details(serde_json::json!({ "org_id": org_id })),
        )
        .await;

    Ok(Json(serde_json::json!({ "deleted": bucket_name })))
}

/// GET /v1/platform/assignments
pub async fn list_assignments(
    State(state): State<StorageState>,
    _operator: PlatformOperator,
) -> Result<Json<Vec<BucketOrgAssignment>>> {
    let assignments = state.repos.assignments.list().await?;
    Ok(Json(assignments))
}

/// POST /v1/platform/assignments
pub async fn create_assignment(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    ValidatedJson(request): ValidatedJson<CreateAssignmentRequest>,
) -> Result<Json<BucketOrgAssignment>> {
    let assignment = state
        .repos
        .assignments
        .create(&request.bucket_name, request.org_id)
        .await
        .map_err(|e| match e {
            vfxsh_common::db::RepositoryError::AlreadyExists => Error::conflict_on(
                "Bucket is already assigned to this organization",
                request.bucket_name.clone(),
            ),
            vfxsh_common::db::RepositoryError::NotFound => {
                Error::NotFound("Organization not found".to_string())
            }
            other => other.into(),
        })?;

    state
        .audit
        .record(
            NewAuditEntry::platform_action(
                auth.user.id,
                auth.user.email.clone(),
                "assignment:create",
                "bucket_org_assignment",
                assignment.id.to_string(),
            )
            .with_details(serde_json::json!({
                "bucket_name": assignment.bucket_name,
                "org_id": assignment.org_id,
            })),
        )
        .await;

    Ok(Json(assignment))
}

/// DELETE /v1/platform/assignments/{id}
pub async fn delete_assignment(
    State(state): State<StorageState>,
    PlatformOperator(auth): PlatformOperator,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.repos.assignments.delete(id).await?;

    state
        .audit
        .record(NewAuditEntry::platform_action(
            auth.user.id,
            auth.user.email.clone(),
            "assignment:delete",
            "bucket_org_assignment",
            id.to_string(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// GET /v1/platform/locks
pub async fn list_locks(
    State(state): State<StorageState>,
    _operator: PlatformOperator,
) -> Result<Json<LocksResponse>> {
    match state.gateway.active_locks().await {
        Ok(locks) => Ok(Json(LocksResponse {
            locks,
            available: true,
        })),
        Err(e) => {
            tracing::warn!("lock listing unavailable: {}", e);
            Ok(Json(LocksResponse {
                locks: Vec::new(),
                available: false,
            }))
        }
    }
}
