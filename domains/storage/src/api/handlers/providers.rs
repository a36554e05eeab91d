//! Org-facing provider listing
//!
//! Org members only ever see provider summaries; credentials never
//! leave the platform surface.

use axum::{extract::State, Json};
use vfxsh_access::domain::capability::{require_capability, Capability};
use vfxsh_auth::OrgScoped;
use vfxsh_common::Result;

use crate::api::middleware::StorageState;
use crate::domain::entities::ProviderSummary;

/// GET /v1/providers
pub async fn list_providers(
    State(state): State<StorageState>,
    scope: OrgScoped,
) -> Result<Json<Vec<ProviderSummary>>> {
    require_capability(scope.org.role, Capability::ProviderRead)?;

    let providers = state.repos.providers.list_summaries().await?;
    Ok(Json(providers))
}
