//! Organization persistence (platform-level CRUD plus org lookup)

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::entities::Organization;

/// Platform organizations list row with denormalized counts
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlatformOrgRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub member_count: i64,
    pub bucket_count: i64,
}

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, org_id: Uuid) -> Result<Option<Organization>, RepositoryError> {
        let org = sqlx::query_as::<_, Organization>(
            "SELECT id, name, created_at FROM organizations WHERE id = $1",
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(org)
    }

    pub async fn list_platform(&self) -> Result<Vec<PlatformOrgRecord>, RepositoryError> {
        let orgs = sqlx::query_as::<_, PlatformOrgRecord>(
            r#"
            SELECT o.id, o.name, o.created_at,
                   (SELECT COUNT(*) FROM memberships m WHERE m.org_id = o.id) AS member_count,
                   (SELECT COUNT(*) FROM buckets b WHERE b.org_id = o.id) AS bucket_count
            FROM organizations o
            ORDER BY o.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orgs)
    }

    pub async fn create(&self, name: &str) -> Result<Organization, RepositoryError> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::AlreadyExists
            }
            _ => RepositoryError::Connection(e),
        })?;

        Ok(org)
    }

    /// Delete an organization and everything scoped under it
    pub async fn delete(&self, org_id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for table in [
            "user_acls",
            "group_acls",
            "group_memberships",
            "groups",
            "access_keys",
            "virtual_bucket_sources",
            "buckets",
            "bucket_org_assignments",
            "memberships",
        ] {
            let query = format!("DELETE FROM {} WHERE org_id = $1", table);
            sqlx::query(&query).bind(org_id).execute(&mut *tx).await?;
        }

        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(org_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
