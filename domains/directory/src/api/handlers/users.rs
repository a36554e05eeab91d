//! Org user directory

use axum::{extract::State, Json};
use vfxsh_auth::OrgScoped;
use vfxsh_common::Result;

use crate::api::middleware::DirectoryState;
use crate::domain::entities::User;

/// GET /v1/users — users visible to the organization (its members)
pub async fn list_users(
    State(state): State<DirectoryState>,
    scope: OrgScoped,
) -> Result<Json<Vec<User>>> {
    let users = state.repos.users.list_for_org(scope.org.org_id).await?;
    Ok(Json(users))
}
