//! Storage domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;
use vfxsh_access::repository::AccessRepositories;
use vfxsh_access::AccessDecisionEngine;
use vfxsh_audit::AuditRecorder;
use vfxsh_auth::AuthBackend;

use crate::gateway::StorageGateway;
use crate::repository::StorageRepositories;
use crate::resolver::BucketResolver;

/// Application state for the storage domain
#[derive(Clone)]
pub struct StorageState {
    pub repos: StorageRepositories,
    pub resolver: BucketResolver,
    /// Bucket-level enforcement for the browse path
    pub engine: AccessDecisionEngine,
    pub gateway: Arc<dyn StorageGateway>,
    pub auth: AuthBackend,
    pub audit: AuditRecorder,
}

impl StorageState {
    pub fn new(pool: PgPool, auth: AuthBackend, gateway: Arc<dyn StorageGateway>) -> Self {
        let repos = StorageRepositories::new(pool.clone());
        let resolver = BucketResolver::new(repos.buckets.clone(), repos.sources.clone());
        let acl_repos = AccessRepositories::new(pool.clone());
        Self {
            repos,
            resolver,
            engine: AccessDecisionEngine::new(acl_repos.user_acls, acl_repos.group_acls),
            gateway,
            auth,
            audit: AuditRecorder::new(pool),
        }
    }
}

impl FromRef<StorageState> for AuthBackend {
    fn from_ref(state: &StorageState) -> Self {
        state.auth.clone()
    }
}
