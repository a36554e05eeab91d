//! Audit domain state and auth backend integration

use axum::extract::FromRef;
use sqlx::PgPool;
use vfxsh_auth::AuthBackend;

use crate::repository::AuditLogRepository;

/// Application state for the audit domain
#[derive(Clone)]
pub struct AuditState {
    pub repo: AuditLogRepository,
    pub auth: AuthBackend,
}

impl AuditState {
    pub fn new(pool: PgPool, auth: AuthBackend) -> Self {
        Self {
            repo: AuditLogRepository::new(pool),
            auth,
        }
    }
}

impl FromRef<AuditState> for AuthBackend {
    fn from_ref(state: &AuditState) -> Self {
        state.auth.clone()
    }
}
