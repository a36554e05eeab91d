//! Access domain state and auth backend integration

use axum::extract::FromRef;
use sqlx::PgPool;
use vfxsh_audit::AuditRecorder;
use vfxsh_auth::AuthBackend;

use crate::engine::AccessDecisionEngine;
use crate::repository::AccessRepositories;

/// Application state for the access domain
#[derive(Clone)]
pub struct AccessState {
    pub repos: AccessRepositories,
    pub engine: AccessDecisionEngine,
    pub auth: AuthBackend,
    pub audit: AuditRecorder,
}

impl AccessState {
    pub fn new(pool: PgPool, auth: AuthBackend) -> Self {
        let repos = AccessRepositories::new(pool.clone());
        let engine = AccessDecisionEngine::new(repos.user_acls.clone(), repos.group_acls.clone());
        Self {
            repos,
            engine,
            auth,
            audit: AuditRecorder::new(pool),
        }
    }
}

impl FromRef<AccessState> for AuthBackend {
    fn from_ref(state: &AccessState) -> Self {
        state.auth.clone()
    }
}
