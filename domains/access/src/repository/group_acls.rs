//! Per-group bucket ACL persistence
//!
//! Groups are keyed by their immutable slug. The join through
//! `group_memberships` is how group grants reach individual users.

use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use super::user_acls::{map_reference_error, AclEntry};
use crate::domain::permission::{AclMatrix, AclPermission};

#[derive(Debug, sqlx::FromRow)]
struct GroupAclRow {
    group_id: String,
    bucket_name: String,
    permission: AclPermission,
}

#[derive(Clone)]
pub struct GroupAclRepository {
    pool: PgPool,
}

impl GroupAclRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Keyed atomic upsert for one (group, bucket) grant
    pub async fn upsert(
        &self,
        org_id: Uuid,
        group_id: &str,
        bucket_name: &str,
        permission: AclPermission,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO group_acls (org_id, group_id, bucket_name, permission)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (org_id, group_id, bucket_name)
            DO UPDATE SET permission = EXCLUDED.permission
            "#,
        )
        .bind(org_id)
        .bind(group_id)
        .bind(bucket_name)
        .bind(permission)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        Ok(())
    }

    pub async fn remove(
        &self,
        org_id: Uuid,
        group_id: &str,
        bucket_name: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM group_acls WHERE org_id = $1 AND group_id = $2 AND bucket_name = $3",
        )
        .bind(org_id)
        .bind(group_id)
        .bind(bucket_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_group(
        &self,
        org_id: Uuid,
        group_id: &str,
    ) -> Result<Vec<AclEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, AclEntry>(
            r#"
            SELECT bucket_name, permission
            FROM group_acls
            WHERE org_id = $1 AND group_id = $2
            ORDER BY bucket_name
            "#,
        )
        .bind(org_id)
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sparse matrix of all group grants in the organization
    pub async fn matrix(&self, org_id: Uuid) -> Result<AclMatrix, RepositoryError> {
        let rows = sqlx::query_as::<_, GroupAclRow>(
            r#"
            SELECT group_id, bucket_name, permission
            FROM group_acls
            WHERE org_id = $1
            ORDER BY group_id, bucket_name
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        let mut matrix = AclMatrix::new();
        for row in rows {
            matrix
                .entry(row.group_id)
                .or_default()
                .insert(row.bucket_name, row.permission);
        }
        Ok(matrix)
    }

    /// Grants a user inherits on a bucket through group membership
    pub async fn grants_for_user(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        bucket_name: &str,
    ) -> Result<Vec<AclPermission>, RepositoryError> {
        let grants = sqlx::query_scalar::<_, AclPermission>(
            r#"
            SELECT ga.permission
            FROM group_acls ga
            JOIN group_memberships gm
              ON gm.org_id = ga.org_id AND gm.group_id = ga.group_id
            WHERE ga.org_id = $1 AND gm.user_id = $2 AND ga.bucket_name = $3
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(bucket_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(grants)
    }

    /// Cascade used when a bucket is deleted
    pub async fn remove_for_bucket(
        &self,
        org_id: Uuid,
        bucket_name: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM group_acls WHERE org_id = $1 AND bucket_name = $2")
            .bind(org_id)
            .bind(bucket_name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
