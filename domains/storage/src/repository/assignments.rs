//! Platform bucket-to-organization assignments

use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::entities::BucketOrgAssignment;

#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<BucketOrgAssignment>, RepositoryError> {
        let assignments = sqlx::query_as::<_, BucketOrgAssignment>(
            r#"
            SELECT id, bucket_name, org_id, created_at
            FROM bucket_org_assignments
            ORDER BY bucket_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn create(
        &self,
        bucket_name: &str,
        org_id: Uuid,
    ) -> Result<BucketOrgAssignment, RepositoryError> {
        let assignment = sqlx::query_as::<_, BucketOrgAssignment>(
            r#"
            INSERT INTO bucket_org_assignments (bucket_name, org_id)
            VALUES ($1, $2)
            RETURNING id, bucket_name, org_id, created_at
            "#,
        )
        .bind(bucket_name)
        .bind(org_id)
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

        Ok(assignment)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM bucket_org_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
