//! Per-user bucket ACL persistence

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::permission::{AclMatrix, AclPermission};

/// One ACL grant as listed for a single entity
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AclEntry {
    pub bucket_name: String,
    pub permission: AclPermission,
}

#[derive(Debug, sqlx::FromRow)]
struct UserAclRow {
    user_id: Uuid,
    bucket_name: String,
    permission: AclPermission,
}

#[derive(Clone)]
pub struct UserAclRepository {
    pool: PgPool,
}

impl UserAclRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Keyed atomic upsert for one (user, bucket) grant
    pub async fn upsert(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        bucket_name: &str,
        permission: AclPermission,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_acls (org_id, user_id, bucket_name, permission)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (org_id, user_id, bucket_name)
            DO UPDATE SET permission = EXCLUDED.permission
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(bucket_name)
        .bind(permission)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        Ok(())
    }

    /// Remove a grant; setting a permission to none deletes the row
    /// rather than storing an explicit "none".
    pub async fn remove(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        bucket_name: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM user_acls WHERE org_id = $1 AND user_id = $2 AND bucket_name = $3",
        )
        .bind(org_id)
        .bind(user_id)
        .bind(bucket_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All grants for one user, ordered by bucket name
    pub async fn list_for_user(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<AclEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, AclEntry>(
            r#"
            SELECT bucket_name, permission
            FROM user_acls
            WHERE org_id = $1 AND user_id = $2
            ORDER BY bucket_name
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Replace all of a user's grants in one transaction.
    ///
    /// Console-compatibility path for the full-replace ACL update; the
    /// delete and inserts commit together or not at all.
    pub async fn replace_for_user(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        entries: &[(String, AclPermission)],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_acls WHERE org_id = $1 AND user_id = $2")
            .bind(org_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for (bucket_name, permission) in entries {
            sqlx::query(
                r#"
                INSERT INTO user_acls (org_id, user_id, bucket_name, permission)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (org_id, user_id, bucket_name)
                DO UPDATE SET permission = EXCLUDED.permission
                "#,
            )
            .bind(org_id)
            .bind(user_id)
            .bind(bucket_name)
            .bind(permission)
            .execute(&mut *tx)
            .await
            .map_err(map_reference_error)?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Sparse matrix of all user grants in the organization
    pub async fn matrix(&self, org_id: Uuid) -> Result<AclMatrix, RepositoryError> {
        let rows = sqlx::query_as::<_, UserAclRow>(
            r#"
            SELECT user_id, bucket_name, permission
            FROM user_acls
            WHERE org_id = $1
            ORDER BY user_id, bucket_name
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        let mut matrix = AclMatrix::new();
        for row in rows {
            matrix
                .entry(row.user_id.to_string())
                .or_default()
                .insert(row.bucket_name, row.permission);
        }
        Ok(matrix)
    }

    /// Direct grant for one (user, bucket), if any
    pub async fn direct_permission(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        bucket_name: &str,
    ) -> Result<Option<AclPermission>, RepositoryError> {
        let permission = sqlx::query_scalar::<_, AclPermission>(
            r#"
            SELECT permission
            FROM user_acls
            WHERE org_id = $1 AND user_id = $2 AND bucket_name = $3
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(bucket_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(permission)
    }

    /// Cascade used when a bucket is deleted
    pub async fn remove_for_bucket(
        &self,
        org_id: Uuid,
        bucket_name: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM user_acls WHERE org_id = $1 AND bucket_name = $2")
            .bind(org_id)
            .bind(bucket_name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Foreign-key violations mean the referenced user or bucket is unknown
pub(crate) fn map_reference_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => RepositoryError::NotFound,
        _ => RepositoryError::Connection(e),
    }
}
