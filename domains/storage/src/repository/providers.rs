//! Provider persistence
//!
//! Full rows (with credentials) stay inside this domain; everything
//! serialized outward is a [`ProviderSummary`].

use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;
use vfxsh_common::Error;

use crate::domain::entities::{Provider, ProviderSummary};
use crate::domain::guards::ensure_provider_unused;

#[derive(Clone)]
pub struct ProviderRepository {
    pool: PgPool,
}

impl ProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_summaries(&self) -> Result<Vec<ProviderSummary>, RepositoryError> {
        let providers = sqlx::query_as::<_, ProviderSummary>(
            r#"
            SELECT id, name, endpoint_url, region, enabled, created_at
            FROM providers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(providers)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Provider>, RepositoryError> {
        let provider = sqlx::query_as::<_, Provider>(
            r#"
            SELECT id, name, endpoint_url, region, access_key_id, secret_access_key, enabled, created_at
            FROM providers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(provider)
    }

    pub async fn create(&self, provider: &Provider) -> Result<ProviderSummary, RepositoryError> {
        let created = sqlx::query_as::<_, ProviderSummary>(
            r#"
            INSERT INTO providers
                (id, name, endpoint_url, region, access_key_id, secret_access_key, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, endpoint_url, region, enabled, created_at
            "#,
        )
        .bind(provider.id)
        .bind(&provider.name)
        .bind(&provider.endpoint_url)
        .bind(&provider.region)
        .bind(&provider.access_key_id)
        .bind(&provider.secret_access_key)
        .bind(provider.enabled)
        .bind(provider.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::AlreadyExists
            }
            _ => RepositoryError::Connection(e),
        })?;

        Ok(created)
    }

    /// Update mutable fields. Credentials are replaced only when new
    /// values are supplied; they are never read back to the caller.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        endpoint_url: Option<&str>,
        region: Option<&str>,
        access_key_id: Option<&str>,
        secret_access_key: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<ProviderSummary, RepositoryError> {
        let provider = sqlx::query_as::<_, ProviderSummary>(
            r#"
            UPDATE providers
            SET name = COALESCE($2, name),
                endpoint_url = COALESCE($3, endpoint_url),
                region = COALESCE($4, region),
                access_key_id = COALESCE($5, access_key_id),
                secret_access_key = COALESCE($6, secret_access_key),
                enabled = COALESCE($7, enabled)
            WHERE id = $1
            RETURNING id, name, endpoint_url, region, enabled, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(endpoint_url)
        .bind(region)
        .bind(access_key_id)
        .bind(secret_access_key)
        .bind(enabled)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(provider)
    }

    /// Delete a provider, guarded in one transaction: `Conflict` while
    /// any bucket still maps to it. The referencing rows are locked so a
    /// concurrent bucket create cannot slip past the check.
    pub async fn delete(&self, id: Uuid) -> vfxsh_common::Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let in_use = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM (SELECT bucket_name FROM buckets WHERE provider_id = $1 FOR UPDATE) AS locked",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        ensure_provider_unused(id, in_use)?;

        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Provider {} not found", id)));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
