//! User persistence
//!
//! Users are normally provisioned lazily at sign-in by the auth
//! backend; platform operators can also pre-provision them by email.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vfxsh_common::db::RepositoryError;

use crate::domain::entities::User;

/// Platform users list row: user plus how many organizations they
/// belong to
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlatformUserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub is_platform_operator: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub org_count: i64,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, is_platform_operator, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, is_platform_operator, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Users visible inside an organization (its members)
    pub async fn list_for_org(&self, org_id: Uuid) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.is_platform_operator, u.created_at
            FROM users u
            JOIN memberships m ON m.user_id = u.id
            WHERE m.org_id = $1
            ORDER BY u.email
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Every user on the platform, with org counts
    pub async fn list_platform(&self) -> Result<Vec<PlatformUserRecord>, RepositoryError> {
        let users = sqlx::query_as::<_, PlatformUserRecord>(
            r#"
            SELECT u.id, u.email, u.name, u.is_platform_operator, u.created_at,
                   COUNT(m.org_id) AS org_count
            FROM users u
            LEFT JOIN memberships m ON m.user_id = u.id
            GROUP BY u.id
            ORDER BY u.email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Pre-provision a user ahead of their first sign-in. The identity
    /// provider subject is linked when they authenticate.
    pub async fn create(
        &self,
        email: &str,
        name: Option<&str>,
        is_platform_operator: bool,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, is_platform_operator, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, email, name, is_platform_operator, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(is_platform_operator)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::AlreadyExists
            }
            _ => RepositoryError::Connection(e),
        })?;

        Ok(user)
    }

    /// Platform-level user update (display name, operator flag)
    pub async fn update_platform(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        is_platform_operator: Option<bool>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                is_platform_operator = COALESCE($3, is_platform_operator)
            WHERE id = $1
            RETURNING id, email, name, is_platform_operator, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(is_platform_operator)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(user)
    }
}
