//! Directory domain state and auth backend integration

use axum::extract::FromRef;
use sqlx::PgPool;
use vfxsh_access::repository::GroupAclRepository;
use vfxsh_audit::AuditRecorder;
use vfxsh_auth::AuthBackend;

use crate::repository::DirectoryRepositories;

/// Application state for the directory domain
#[derive(Clone)]
pub struct DirectoryState {
    pub repos: DirectoryRepositories,
    /// Group grants are part of the group detail view
    pub group_acls: GroupAclRepository,
    pub auth: AuthBackend,
    pub audit: AuditRecorder,
}

impl DirectoryState {
    pub fn new(pool: PgPool, auth: AuthBackend) -> Self {
        Self {
            repos: DirectoryRepositories::new(pool.clone()),
            group_acls: GroupAclRepository::new(pool.clone()),
            auth,
            audit: AuditRecorder::new(pool),
        }
    }
}

impl FromRef<DirectoryState> for AuthBackend {
    fn from_ref(state: &DirectoryState) -> Self {
        state.auth.clone()
    }
}
