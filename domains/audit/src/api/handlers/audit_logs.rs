//! Platform audit log handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use vfxsh_auth::PlatformOperator;
use vfxsh_common::{Pagination, Result};

use crate::api::middleware::AuditState;
use crate::domain::entities::AuditEntry;
use crate::repository::AuditFilter;

/// Query filters for audit log listing
#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub org_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    /// Action prefix filter, e.g. `bucket:` or `acl:`
    pub action: Option<String>,
}

/// GET /v1/platform/audit-logs
pub async fn list_audit_logs(
    State(state): State<AuditState>,
    _operator: PlatformOperator,
    Query(filter): Query<AuditLogQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<AuditEntry>>> {
    let filter = AuditFilter {
        org_id: filter.org_id,
        user_id: filter.user_id,
        action_prefix: filter.action,
    };

    let entries = state.repo.list(&filter, &pagination).await?;
    Ok(Json(entries))
}
