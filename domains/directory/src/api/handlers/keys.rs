//! Access key handlers
//!
//! Every role may manage its own keys (`key:own`); acting on another
//! user's keys requires `key:manage`. Secrets appear in exactly two
//! responses: key creation and rotation.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vfxsh_access::domain::capability::{require_capability, Capability};
use vfxsh_audit::NewAuditEntry;
use vfxsh_auth::OrgScoped;
use vfxsh_common::{Error, Result, ValidatedJson};

use crate::api::middleware::DirectoryState;
use crate::domain::entities::AccessKey;
use crate::repository::access_keys::AccessKeyRecord;
use crate::repository::transactions::rotate_key_secret_tx;

#[derive(Debug, Deserialize)]
pub struct ListKeysQuery {
    /// Defaults to the caller's own keys; `all` requires `key:manage`
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateKeyRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Create on behalf of another user (requires `key:manage`)
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateKeyRequest {
    pub enabled: bool,
}

/// Creation/rotation response: the only places a secret is ever shown
#[derive(Debug, Serialize)]
pub struct KeySecretResponse {
    pub access_key_id: String,
    pub secret: String,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// GET /v1/keys
pub async fn list_keys(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Query(query): Query<ListKeysQuery>,
) -> Result<Json<Vec<AccessKeyRecord>>> {
    if query.all {
        require_capability(scope.org.role, Capability::KeyManage)?;
        let keys = state.repos.access_keys.list_for_org(scope.org.org_id).await?;
        return Ok(Json(keys));
    }

    let subject = query.user_id.unwrap_or(scope.auth.user.id);
    if subject != scope.auth.user.id {
        require_capability(scope.org.role, Capability::KeyManage)?;
    }

    let keys = state
        .repos
        .access_keys
        .list_for_user(scope.org.org_id, subject)
        .await?;
    Ok(Json(keys))
}

/// POST /v1/keys
pub async fn create_key(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    ValidatedJson(request): ValidatedJson<CreateKeyRequest>,
) -> Result<Json<KeySecretResponse>> {
    let owner = request.user_id.unwrap_or(scope.auth.user.id);
    if owner == scope.auth.user.id {
        require_capability(scope.org.role, Capability::KeyOwn)?;
    } else {
        require_capability(scope.org.role, Capability::KeyManage)?;
    }

    let (key, secret) = AccessKey::generate(owner, scope.org.org_id, request.name, request.expires_at)?;
    state.repos.access_keys.insert(&key).await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "key:create",
                "access_key",
                key.access_key_id.clone(),
            )
            .with_details(serde_json::json!({ "user_id": owner })),
        )
        .await;

    Ok(Json(KeySecretResponse {
        access_key_id: key.access_key_id,
        secret,
        user_id: key.user_id,
        name: key.name,
        expires_at: key.expires_at,
    }))
}

/// PUT /v1/keys/{id} — enable or disable
pub async fn update_key(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(access_key_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateKeyRequest>,
) -> Result<Json<serde_json::Value>> {
    let key = load_owned_key(&state, &scope, &access_key_id).await?;

    state
        .repos
        .access_keys
        .set_enabled(scope.org.org_id, &key.access_key_id, request.enabled)
        .await?;

    state
        .audit
        .record(
            NewAuditEntry::org_action(
                scope.auth.user.id,
                scope.auth.user.email.clone(),
                scope.org.org_id,
                "key:update",
                "access_key",
                key.access_key_id.clone(),
            )
            .with_details(serde_json::json!({ "enabled": request.enabled })),
        )
        .await;

    Ok(Json(serde_json::json!({
        "access_key_id": key.access_key_id,
        "enabled": request.enabled,
    })))
}

/// DELETE /v1/keys/{id}
pub async fn delete_key(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(access_key_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let key = load_owned_key(&state, &scope, &access_key_id).await?;

    state
        .repos
        .access_keys
        .delete(scope.org.org_id, &key.access_key_id)
        .await?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "key:delete",
            "access_key",
            key.access_key_id.clone(),
        ))
        .await;

    Ok(Json(serde_json::json!({ "deleted": key.access_key_id })))
}

/// POST /v1/keys/{id}/rotate
///
/// Atomically replaces the secret: once the transaction commits, only
/// the new secret verifies. The new plaintext is disclosed once, here.
pub async fn rotate_key(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
    Path(access_key_id): Path<String>,
) -> Result<Json<KeySecretResponse>> {
    let mut key = load_owned_key(&state, &scope, &access_key_id).await?;

    let secret = key.rotate()?;
    let mut tx = state.repos.begin().await?;
    rotate_key_secret_tx(&mut tx, scope.org.org_id, &key.access_key_id, &key.secret_hash).await?;
    tx.commit()
        .await
        .map_err(vfxsh_common::db::RepositoryError::Connection)?;

    state
        .audit
        .record(NewAuditEntry::org_action(
            scope.auth.user.id,
            scope.auth.user.email.clone(),
            scope.org.org_id,
            "key:rotate",
            "access_key",
            key.access_key_id.clone(),
        ))
        .await;

    Ok(Json(KeySecretResponse {
        access_key_id: key.access_key_id,
        secret,
        user_id: key.user_id,
        name: key.name,
        expires_at: key.expires_at,
    }))
}

/// Load a key, enforcing ownership or `key:manage`
async fn load_owned_key(
    state: &DirectoryState,
    scope: &OrgScoped,
    access_key_id: &str,
) -> Result<AccessKey> {
    let key = state
        .repos
        .access_keys
        .get(scope.org.org_id, access_key_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Access key {} not found", access_key_id)))?;

    if key.user_id != scope.auth.user.id {
        require_capability(scope.org.role, Capability::KeyManage)?;
    }
    Ok(key)
}
