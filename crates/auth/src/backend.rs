//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns auth-specific SQL queries.
//! Uses runtime `sqlx::query_as` (not macros) consistent with the
//! cross-domain read pattern used throughout the workspace.

use sqlx::PgPool;
use uuid::Uuid;

use crate::claims::IdpClaims;
use crate::config::AuthConfig;
use crate::context::{AuthContext, OrgContext};
use crate::error::AuthError;
use crate::jwt::validate_jwt_token;
use crate::types::AuthIdentity;
use vfxsh_common::OrgRole;

/// Row type for membership lookup
#[derive(sqlx::FromRow)]
struct MembershipRow {
    role: OrgRole,
}

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    /// Validate a JWT and resolve (or lazily provision) the user record.
    ///
    /// Users are synced from the identity provider on first sign-in, keyed
    /// by the provider subject id. A returning user's email and name are
    /// refreshed from the token.
    pub async fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = validate_jwt_token(token, &self.config)?;
        let user = self.upsert_user_from_claims(&claims).await?;
        Ok(AuthContext::new(user))
    }

    /// Resolve the caller's membership in the scoped organization.
    ///
    /// Returns `None` when the user has no membership row, which callers
    /// must treat as an unresolvable organization context.
    pub async fn resolve_membership(
        &self,
        user_id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<OrgContext>, AuthError> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT role
            FROM memberships
            WHERE user_id = $1 AND org_id = $2
            "#,
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load membership");
            AuthError::AuthenticationFailed
        })?;

        Ok(row.map(|r| OrgContext {
            org_id,
            role: r.role,
        }))
    }

    async fn upsert_user_from_claims(&self, claims: &IdpClaims) -> Result<AuthIdentity, AuthError> {
        // A pre-provisioned user (created by an operator before first
        // sign-in) has no subject id yet; claim that row by email first so
        // the upsert below does not collide on the email unique constraint.
        sqlx::query("UPDATE users SET idp_sub = $1 WHERE email = $2 AND idp_sub IS NULL")
            .bind(&claims.sub)
            .bind(&claims.email)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to link pre-provisioned user");
                AuthError::UserLoadError
            })?;

        let user: AuthIdentity = sqlx::query_as(
            r#"
            INSERT INTO users (id, idp_sub, email, name, is_platform_operator, created_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW())
            ON CONFLICT (idp_sub) DO UPDATE
                SET email = EXCLUDED.email,
                    name = COALESCE(EXCLUDED.name, users.name)
            RETURNING id, email, name, is_platform_operator, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&claims.sub)
        .bind(&claims.email)
        .bind(&claims.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to provision user from claims");
            AuthError::UserLoadError
        })?;

        Ok(user)
    }
}
