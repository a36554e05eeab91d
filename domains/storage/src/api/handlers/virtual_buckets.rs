//! Virtual bucket source management

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_access::domain::capability::{require_capability, Capability};
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Error, Result, ValidatedJson};

use crate::api::middleware::StorageState;
use crate::domain::entities::{Bucket, BucketType, VirtualBucketSource};

#[derive(Debug, Deserialize, Validate)]
pub struct AddSourceRequest {
    #[validate(length(min = 3, max = 63))]
    pub source_bucket_name: String,
    /// Folder within the source bucket; empty means the bucket root
    #[serde(default)]
    pub source_prefix: String,
    pub display_name: Option<String>,
    /// Path under the virtual bucket where this source appears
    #[serde(default)]
    pub mount_point: String,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSourceRequest {
    pub source_prefix: Option<String>,
    pub display_name: Option<String>,
    pub mount_point: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct VirtualBucketResponse {
    #[serde(flatten)]
    pub bucket: Bucket,
    /// Ordered by sort_order ascending; source 0 is the default write
    /// target
    pub sources: Vec<VirtualBucketSource>,
}

/// Load a bucket and insist it is virtual
async fn load_virtual_bucket(
    state: &StorageState,
    org_id: Uuid,
    bucket_name: &str,
) -> Result<Bucket> {
    let bucket = state
        .repos
        .buckets
        .get(org_id, bucket_name)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Bucket {} not found", bucket_name)))?;

    if bucket.bucket_type != BucketType::Virtual {
        return Err(Error::Validation(format!(
            "Bucket {} is not a virtual bucket",
            bucket_name
        )));
    }
    Ok(bucket)
}

/// GET /v1/virtual-buckets/{name}
pub async fn get_virtual_bucket(
    State(state): State<StorageState>,
    scope: OrgScoped,
    Path(bucket_name): Path<String>,
) -> Result<Json<VirtualBucketResponse>> {
    require_capability(scope.org.role, Capability::BucketRead)?;

    let bucket = load_virtual_bucket(&state, scope.org.org_id, &bucket_name).await?;
    let sources = state
        .repos
        .sources
        .list_for_bucket(scope.org.org_id, &bucket_name)
        .await?;

    Ok(Json(VirtualBucketResponse { bucket, sources }))
}

/// POST /v1/virtual-buckets/{name}/sources
pub async fn add_source(
    State(state): State<StorageState>,
    scope: OrgScoped,
    Path(bucket_name): Path<String>,
    ValidatedJson(request): ValidatedJson<AddSourceRequest>,
) -> Result<Json<VirtualBucketSource>> {
    require_capability(scope.org.role, Capability::VirtualBucketCreate)?;

    load_virtual_bucket(&state, scope.org.org_id, &bucket_name).await?;

    // Sources must point at standard buckets: chaining virtual buckets
    // would make resolution recursive
    let source_bucket = state
        .repos
        .buckets
        .get(scope.org.org_id, &request.source_bucket_name)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Source bucket {} not found",
                request.source_bucket_name
            ))
        })?;
    if source_bucket.bucket_type != BucketType::Standard {
        return Err(Error::Validation(
            "Virtual bucket sources must reference standard buckets".to_string(),
        ));
    }

    let source = VirtualBucketSource {
        id: Uuid::new_v4(),
        org_id: scope.org.org_id,
        virtual_bucket_name: bucket_name.clone(),
        source_bucket_name: request.source_bucket_name,
        source_prefix: request.source_prefix,
        display_name: request.display_name,
        mount_point: request.mount_point,
        sort_order: request.sort_order,
        created_at: Utc::now(),
    };
    let created = state.repos.sources.insert(&source).await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "virtual-bucket:add-source",
                "virtual_bucket",
                bucket_name,
            )
            .with_details(serde_json::json!({
                "source_bucket_name": created.source_bucket_name,
                "sort_order": created.sort_order,
            })),
        )
        .await;

    Ok(Json(created))
}

/// PUT /v1/virtual-buckets/{name}/sources/{source_id}
pub async fn update_source(
    State(state): State<StorageState>,
    scope: OrgScoped,
    Path((bucket_name, source_id)): Path<(String, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateSourceRequest>,
) -> Result<Json<VirtualBucketSource>> {
    require_capability(scope.org.role, Capability::VirtualBucketCreate)?;

    let source = state
        .repos
        .sources
        .update(
            scope.org.org_id,
            source_id,
            request.source_prefix.as_deref(),
            request.display_name.as_deref(),
            request.mount_point.as_deref(),
            request.sort_order,
        )
        .await?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "virtual-bucket:update-source",
            "virtual_bucket",
            bucket_name,
        ))
        .await;

    Ok(Json(source))
}

/// DELETE /v1/virtual-buckets/{name}/sources/{source_id}
pub async fn remove_source(
    State(state): State<StorageState>,
    scope: OrgScoped,
    Path((bucket_name, source_id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>> {
    require_capability(scope.org.role, Capability::VirtualBucketDelete)?;

    state.repos.sources.delete(scope.org.org_id, source_id).await?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "virtual-bucket:remove-source",
            "virtual_bucket",
            bucket_name,
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": source_id })))
}
