//! Org-scoped bucket handlers
//!
//! Browsing is the one data-path adjacent operation this core serves:
//! it enforces the full access decision (org capability gate, then
//! bucket ACL) before asking the gateway for a listing.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;
use vfxsh_access::domain::capability::{require_capability, Capability};
use vfxsh_access::{AccessDecision, AclPermission};
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Error, Result, ValidatedJson};

use crate::api::middleware::StorageState;
use crate::domain::entities::{Bucket, BucketType};
use crate::domain::resolver::{route_read, translate_path, Resolved};
use crate::gateway::BrowseResponse;
use crate::repository::buckets::BucketRecord;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBucketRequest {
    #[validate(length(min = 3, max = 63))]
    pub bucket_name: String,
    pub bucket_type: BucketType,
    pub provider_id: Option<uuid::Uuid>,
    pub remote_bucket_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub prefix: String,
}

/// GET /v1/buckets
pub async fn list_buckets(
    State(state): State<StorageState>,
    scope: OrgScoped,
) -> Result<Json<Vec<BucketRecord>>> {
    require_capability(scope.org.role, Capability::BucketRead)?;

    let buckets = state.repos.buckets.list(scope.org.org_id).await?;
    Ok(Json(buckets))
}

/// POST /v1/buckets
///
/// Virtual buckets are an org-admin feature; creating a standard
/// mapping rewires physical storage and stays with the org owner.
pub async fn create_bucket(
    State(state): State<StorageState>,
    scope: OrgScoped,
    ValidatedJson(request): ValidatedJson<CreateBucketRequest>,
) -> Result<Json<Bucket>> {
    let bucket = match request.bucket_type {
        BucketType::Virtual => {
            require_capability(scope.org.role, Capability::VirtualBucketCreate)?;
            Bucket::new_virtual(scope.org.org_id, request.bucket_name)?
        }
        BucketType::Standard => {
            require_capability(scope.org.role, Capability::OrgManage)?;
            let provider_id = request.provider_id.ok_or_else(|| {
                Error::Validation("provider_id is required for standard buckets".to_string())
            })?;
            let remote = request.remote_bucket_name.ok_or_else(|| {
                Error::Validation(
                    "remote_bucket_name is required for standard buckets".to_string(),
                )
            })?;
            Bucket::standard(scope.org.org_id, request.bucket_name, provider_id, remote)?
        }
    };

    let created = state.repos.buckets.create(&bucket).await.map_err(|e| match e {
        vfxsh_common::db::RepositoryError::AlreadyExists => Error::conflict_on(
            "A bucket with this name already exists",
            bucket.bucket_name.clone(),
        ),
        other => other.into(),
    })?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "bucket:create",
                "bucket",
                created.bucket_name.clone(),
            )
            .with_details(serde_json::json!({ "bucket_type": created.bucket_type })),
        )
        .await;

    Ok(Json(created))
}

/// DELETE /v1/buckets/{name}
pub async fn delete_bucket(
    State(state): State<StorageState>,
    scope: OrgScoped,
    Path(bucket_name): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let bucket = state
        .repos
        .buckets
        .get(scope.org.org_id, &bucket_name)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Bucket {} not found", bucket_name)))?;

    match bucket.bucket_type {
        BucketType::Virtual => {
            require_capability(scope.org.role, Capability::VirtualBucketDelete)?
        }
        BucketType::Standard => require_capability(scope.org.role, Capability::OrgManage)?,
    }

    state.repos.buckets.delete(scope.org.org_id, &bucket_name).await?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "bucket:delete",
            "bucket",
            bucket_name.clone(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": bucket_name })))
}

/// GET /v1/buckets/{name}/browse?prefix=
pub async fn browse_bucket(
    State(state): State<StorageState>,
    scope: OrgScoped,
    Path(bucket_name): Path<String>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>> {
    let decision = state
        .engine
        .authorize(
            scope.org.org_id,
            scope.org.role,
            scope.auth.user.id,
            &bucket_name,
            AclPermission::Read,
        )
        .await?;
    if let AccessDecision::Deny { reason } = decision {
        return Err(Error::forbidden_on(reason.as_str(), bucket_name));
    }

    match state.resolver.resolve(scope.org.org_id, &bucket_name).await? {
        Resolved::Physical {
            provider_id,
            remote_bucket_name,
        } => {
            let listing = state
                .gateway
                .browse(provider_id, &remote_bucket_name, &query.prefix)
                .await?;
            Ok(Json(listing))
        }
        Resolved::Virtual { sources } => {
            // A prefix no source covers lists as empty, not as an error
            let Some(source) = route_read(&sources, &query.prefix) else {
                return Ok(Json(BrowseResponse {
                    prefix: query.prefix,
                    ..Default::default()
                }));
            };

            let physical = state
                .repos
                .buckets
                .get(scope.org.org_id, &source.source_bucket_name)
                .await?
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "Source bucket {} not found",
                        source.source_bucket_name
                    ))
                })?;
            let (provider_id, remote) = match (physical.provider_id, physical.remote_bucket_name) {
                (Some(p), Some(r)) => (p, r),
                _ => {
                    return Err(Error::Internal(format!(
                        "Source bucket {} has no physical mapping",
                        source.source_bucket_name
                    )))
                }
            };

            let translated = translate_path(source, &query.prefix);
            let mut listing = state.gateway.browse(provider_id, &remote, &translated).await?;
            listing.prefix = query.prefix;
            Ok(Json(listing))
        }
    }
}
