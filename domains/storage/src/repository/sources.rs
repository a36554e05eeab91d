//! Virtual bucket source persistence
//!
//! Sources are always read back ordered by `sort_order` ascending; the
//! resolver depends on that ordering.

use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::entities::VirtualBucketSource;

#[derive(Clone)]
pub struct SourceRepository {
    pool: PgPool,
}

impl SourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_bucket(
        &self,
        org_id: Uuid,
        virtual_bucket_name: &str,
    ) -> Result<Vec<VirtualBucketSource>, RepositoryError> {
        let sources = sqlx::query_as::<_, VirtualBucketSource>(
            r#"
            SELECT id, org_id, virtual_bucket_name, source_bucket_name, source_prefix,
                   display_name, mount_point, sort_order, created_at
            FROM virtual_bucket_sources
            WHERE org_id = $1 AND virtual_bucket_name = $2
            ORDER BY sort_order
            "#,
        )
        .bind(org_id)
        .bind(virtual_bucket_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(sources)
    }

    pub async fn insert(
        &self,
        source: &VirtualBucketSource,
    ) -> Result<VirtualBucketSource, RepositoryError> {
        let created = sqlx::query_as::<_, VirtualBucketSource>(
            r#"
            INSERT INTO virtual_bucket_sources
                (id, org_id, virtual_bucket_name, source_bucket_name, source_prefix,
                 display_name, mount_point, sort_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, org_id, virtual_bucket_name, source_bucket_name, source_prefix,
                      display_name, mount_point, sort_order, created_at
            "#,
        )
        .bind(source.id)
        .bind(source.org_id)
        .bind(&source.virtual_bucket_name)
        .bind(&source.source_bucket_name)
        .bind(&source.source_prefix)
        .bind(&source.display_name)
        .bind(&source.mount_point)
        .bind(source.sort_order)
        .bind(source.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::AlreadyExists
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            _ => RepositoryError::Connection(e),
        })?;

        Ok(created)
    }

    pub async fn update(
        &self,
        org_id: Uuid,
        source_id: Uuid,
        source_prefix: Option<&str>,
        display_name: Option<&str>,
        mount_point: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<VirtualBucketSource, RepositoryError> {
        let source = sqlx::query_as::<_, VirtualBucketSource>(
            r#"
            UPDATE virtual_bucket_sources
            SET source_prefix = COALESCE($3, source_prefix),
                display_name = COALESCE($4, display_name),
                mount_point = COALESCE($5, mount_point),
                sort_order = COALESCE($6, sort_order)
            WHERE org_id = $1 AND id = $2
            RETURNING id, org_id, virtual_bucket_name, source_bucket_name, source_prefix,
                      display_name, mount_point, sort_order, created_at
            "#,
        )
        .bind(org_id)
        .bind(source_id)
        .bind(source_prefix)
        .bind(display_name)
        .bind(mount_point)
        .bind(sort_order)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(source)
    }

    pub async fn delete(&self, org_id: Uuid, source_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM virtual_bucket_sources WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(source_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
