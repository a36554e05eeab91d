//! Logical bucket persistence
//!
//! Deletion is the invariant-heavy path: a standard bucket referenced
//! by any virtual source cannot be deleted, and a successful delete
//! cascades the bucket's ACL entries and (for virtual buckets) its own
//! source list in the same transaction.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;
use vfxsh_common::Error;

use crate::domain::entities::{Bucket, BucketType};
use crate::domain::guards::ensure_bucket_unreferenced;

/// Bucket list row with provider name and source count for display
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BucketRecord {
    pub bucket_name: String,
    pub bucket_type: BucketType,
    pub provider_id: Option<Uuid>,
    pub provider_name: Option<String>,
    pub remote_bucket_name: Option<String>,
    pub source_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone)]
pub struct BucketRepository {
    pool: PgPool,
}

impl BucketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, org_id: Uuid) -> Result<Vec<BucketRecord>, RepositoryError> {
        let buckets = sqlx::query_as::<_, BucketRecord>(
            r#"
            SELECT b.bucket_name, b.bucket_type, b.provider_id, p.name AS provider_name,
                   b.remote_bucket_name, b.created_at,
                   (SELECT COUNT(*) FROM virtual_bucket_sources s
                    WHERE s.org_id = b.org_id AND s.virtual_bucket_name = b.bucket_name) AS source_count
            FROM buckets b
            LEFT JOIN providers p ON p.id = b.provider_id
            WHERE b.org_id = $1
            ORDER BY b.bucket_name
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(buckets)
    }

    /// All buckets on the platform, across organizations
    pub async fn list_platform(&self) -> Result<Vec<Bucket>, RepositoryError> {
        let buckets = sqlx::query_as::<_, Bucket>(
            r#"
            SELECT bucket_name, org_id, bucket_type, provider_id, remote_bucket_name, created_at
            FROM buckets
            ORDER BY bucket_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(buckets)
    }

    pub async fn get(
        &self,
        org_id: Uuid,
        bucket_name: &str,
    ) -> Result<Option<Bucket>, RepositoryError> {
        let bucket = sqlx::query_as::<_, Bucket>(
            r#"
            SELECT bucket_name, org_id, bucket_type, provider_id, remote_bucket_name, created_at
            FROM buckets
            WHERE org_id = $1 AND bucket_name = $2
            "#,
        )
        .bind(org_id)
        .bind(bucket_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bucket)
    }

    pub async fn create(&self, bucket: &Bucket) -> Result<Bucket, RepositoryError> {
        let created = sqlx::query_as::<_, Bucket>(
            r#"
            INSERT INTO buckets
                (bucket_name, org_id, bucket_type, provider_id, remote_bucket_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING bucket_name, org_id, bucket_type, provider_id, remote_bucket_name, created_at
            "#,
        )
        .bind(&bucket.bucket_name)
        .bind(bucket.org_id)
        .bind(bucket.bucket_type)
        .bind(bucket.provider_id)
        .bind(&bucket.remote_bucket_name)
        .bind(bucket.created_at)
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

    /// Delete a bucket with its invariant guards, in one transaction:
    /// - `Conflict` while any virtual source still references it
    /// - cascades the bucket's user and group ACL entries
    /// - for a virtual bucket, removes its own source list
    pub async fn delete(&self, org_id: Uuid, bucket_name: &str) -> vfxsh_common::Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Lock referencing sources so a concurrent source insert cannot
        // slip past the guard
        let referencing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM (SELECT id FROM virtual_bucket_sources WHERE org_id = $1 AND source_bucket_name = $2 FOR UPDATE) AS locked",
        )
        .bind(org_id)
        .bind(bucket_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        ensure_bucket_unreferenced(bucket_name, referencing)?;

        sqlx::query("DELETE FROM user_acls WHERE org_id = $1 AND bucket_name = $2")
            .bind(org_id)
            .bind(bucket_name)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        sqlx::query("DELETE FROM group_acls WHERE org_id = $1 AND bucket_name = $2")
            .bind(org_id)
            .bind(bucket_name)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        sqlx::query(
            "DELETE FROM virtual_bucket_sources WHERE org_id = $1 AND virtual_bucket_name = $2",
        )
        .bind(org_id)
        .bind(bucket_name)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM buckets WHERE org_id = $1 AND bucket_name = $2")
            .bind(org_id)
            .bind(bucket_name)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Bucket {} not found", bucket_name)));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
