//! Audit log persistence
//!
//! Uses runtime `sqlx::query_as` with explicit binds. The table is
//! append-only; the repository exposes insert and filtered listing only.

use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;
use vfxsh_common::extractors::Pagination;

use crate::domain::entities::{AuditEntry, NewAuditEntry};

/// Optional filters for listing audit entries
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub org_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    /// Matches the action prefix, e.g. `bucket:` matches `bucket:create`
    pub action_prefix: Option<String>,
}

#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &NewAuditEntry) -> Result<AuditEntry, RepositoryError> {
        let row = sqlx::query_as::<_, AuditEntry>(
            r#"
            INSERT INTO audit_log (user_id, user_email, org_id, action, resource_type, resource_id, details, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, timestamp, user_id, user_email, org_id, action, resource_type, resource_id, details, ip_address
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.user_email)
        .bind(entry.org_id)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(entry.details.as_ref().map(sqlx::types::Json))
        .bind(&entry.ip_address)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// List entries newest-first, with optional filters
    pub async fn list(
        &self,
        filter: &AuditFilter,
        pagination: &Pagination,
    ) -> Result<Vec<AuditEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, timestamp, user_id, user_email, org_id, action, resource_type, resource_id, details, ip_address
            FROM audit_log
            WHERE ($1::uuid IS NULL OR org_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
              AND ($3::text IS NULL OR action LIKE $3 || '%')
            ORDER BY timestamp DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.org_id)
        .bind(filter.user_id)
        .bind(&filter.action_prefix)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
