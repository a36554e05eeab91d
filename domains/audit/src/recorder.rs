//! Audit recorder used by mutating handlers
//!
//! Recording is best-effort: an audit insert failure is logged and
//! swallowed so it can never fail the mutation it describes.

use sqlx::PgPool;

use crate::domain::entities::NewAuditEntry;
use crate::repository::AuditLogRepository;

#[derive(Clone)]
pub struct AuditRecorder {
    repo: AuditLogRepository,
}

impl AuditRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: AuditLogRepository::new(pool),
        }
    }

    /// Record an entry, swallowing (but logging) persistence failures.
    pub async fn record(&self, entry: NewAuditEntry) {
        if let Err(e) = self.repo.insert(&entry).await {
            tracing::warn!(
                error = %e,
                action = %entry.action,
                resource_type = %entry.resource_type,
                "Failed to record audit entry"
            );
        }
    }
}
