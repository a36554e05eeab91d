//! Group persistence

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::entities::{Group, GroupMember};

/// Group list row with denormalized member count
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub member_count: i64,
}

#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, org_id: Uuid) -> Result<Vec<GroupRecord>, RepositoryError> {
        let groups = sqlx::query_as::<_, GroupRecord>(
            r#"
            SELECT g.id, g.name, g.description, g.created_at,
                   (SELECT COUNT(*) FROM group_memberships gm
                    WHERE gm.org_id = g.org_id AND gm.group_id = g.id) AS member_count
            FROM groups g
            WHERE g.org_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    pub async fn get(&self, org_id: Uuid, group_id: &str) -> Result<Option<Group>, RepositoryError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, org_id, name, description, created_at
            FROM groups
            WHERE org_id = $1 AND id = $2
            "#,
        )
        .bind(org_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Insert a new group; the slug is the primary key within the org,
    /// so a duplicate maps to `AlreadyExists`.
    pub async fn create(&self, group: &Group) -> Result<Group, RepositoryError> {
        let created = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (id, org_id, name, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, org_id, name, description, created_at
            "#,
        )
        .bind(&group.id)
        .bind(group.org_id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.created_at)
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

    /// Update mutable fields; the slug is immutable
    pub async fn update(
        &self,
        org_id: Uuid,
        group_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Group, RepositoryError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE groups
            SET name = COALESCE($3, name),
                description = COALESCE($4, description)
            WHERE org_id = $1 AND id = $2
            RETURNING id, org_id, name, description, created_at
            "#,
        )
        .bind(org_id)
        .bind(group_id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(group)
    }

    pub async fn list_members(
        &self,
        org_id: Uuid,
        group_id: &str,
    ) -> Result<Vec<GroupMember>, RepositoryError> {
        let members = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT u.id AS user_id, u.email, u.name
            FROM group_memberships gm
            JOIN users u ON u.id = gm.user_id
            WHERE gm.org_id = $1 AND gm.group_id = $2
            ORDER BY u.email
            "#,
        )
        .bind(org_id)
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Add a user to a group. Duplicate edges are rejected by the
    /// primary key and map to `AlreadyExists`.
    pub async fn add_member(
        &self,
        org_id: Uuid,
        group_id: &str,
        user_id: Uuid,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO group_memberships (org_id, group_id, user_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(org_id)
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
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

        Ok(())
    }

    pub async fn remove_member(
        &self,
        org_id: Uuid,
        group_id: &str,
        user_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM group_memberships WHERE org_id = $1 AND group_id = $2 AND user_id = $3",
        )
        .bind(org_id)
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
