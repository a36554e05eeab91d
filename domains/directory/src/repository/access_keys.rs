//! Access key persistence
//!
//! Only the salted hash of a secret is stored. `bucket_count` is
//! denormalized for display from the owner's ACL entries.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::entities::AccessKey;

/// Key list row as rendered in the console (no secret material)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AccessKeyRecord {
    pub access_key_id: String,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub bucket_count: i64,
}

#[derive(Clone)]
pub struct AccessKeyRepository {
    pool: PgPool,
}

impl AccessKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, key: &AccessKey) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO access_keys
                (access_key_id, user_id, org_id, name, secret_hash, expires_at, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&key.access_key_id)
        .bind(key.user_id)
        .bind(key.org_id)
        .bind(&key.name)
        .bind(&key.secret_hash)
        .bind(key.expires_at)
        .bind(key.enabled)
        .bind(key.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(
        &self,
        org_id: Uuid,
        access_key_id: &str,
    ) -> Result<Option<AccessKey>, RepositoryError> {
        let key = sqlx::query_as::<_, AccessKey>(
            r#"
            SELECT access_key_id, user_id, org_id, name, secret_hash, expires_at, enabled, created_at
            FROM access_keys
            WHERE org_id = $1 AND access_key_id = $2
            "#,
        )
        .bind(org_id)
        .bind(access_key_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(key)
    }

    /// Keys owned by one user, with bucket counts from their ACL grants
    pub async fn list_for_user(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<AccessKeyRecord>, RepositoryError> {
        let keys = sqlx::query_as::<_, AccessKeyRecord>(
            r#"
            SELECT k.access_key_id, k.user_id, k.name, k.expires_at, k.enabled, k.created_at,
                   (SELECT COUNT(*) FROM user_acls a
                    WHERE a.org_id = k.org_id AND a.user_id = k.user_id) AS bucket_count
            FROM access_keys k
            WHERE k.org_id = $1 AND k.user_id = $2
            ORDER BY k.created_at DESC
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    /// All keys in the organization (for `key:manage` holders)
    pub async fn list_for_org(&self, org_id: Uuid) -> Result<Vec<AccessKeyRecord>, RepositoryError> {
        let keys = sqlx::query_as::<_, AccessKeyRecord>(
            r#"
            SELECT k.access_key_id, k.user_id, k.name, k.expires_at, k.enabled, k.created_at,
                   (SELECT COUNT(*) FROM user_acls a
                    WHERE a.org_id = k.org_id AND a.user_id = k.user_id) AS bucket_count
            FROM access_keys k
            WHERE k.org_id = $1
            ORDER BY k.created_at DESC
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    pub async fn set_enabled(
        &self,
        org_id: Uuid,
        access_key_id: &str,
        enabled: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE access_keys SET enabled = $3 WHERE org_id = $1 AND access_key_id = $2",
        )
        .bind(org_id)
        .bind(access_key_id)
        .bind(enabled)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, org_id: Uuid, access_key_id: &str) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM access_keys WHERE org_id = $1 AND access_key_id = $2")
                .bind(org_id)
                .bind(access_key_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
