//! Organization membership persistence

use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;
use vfxsh_common::OrgRole;

use crate::domain::entities::{MemberRecord, Membership};

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Members of an organization joined with their user records
    pub async fn list_members(&self, org_id: Uuid) -> Result<Vec<MemberRecord>, RepositoryError> {
        let members = sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT m.user_id, u.email, u.name, m.role, m.created_at
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.org_id = $1
            ORDER BY u.email
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn find(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, RepositoryError> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT user_id, org_id, role, created_at
            FROM memberships
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Add a member. A user holds at most one role per organization, so
    /// a duplicate insert maps to `AlreadyExists`.
    pub async fn add_member(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        role: OrgRole,
    ) -> Result<Membership, RepositoryError> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (org_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, org_id, role, created_at
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(role)
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

        Ok(membership)
    }
}
