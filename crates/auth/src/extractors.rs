//! Axum extractors for authentication and organization scoping
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::backend::AuthBackend;
use crate::context::{AuthContext, OrgContext};
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;

/// Header carrying the organization scope on org-level requests
pub const ORG_HEADER: &str = "x-organization-id";

/// Authenticated user extractor (JWT only)
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_jwt(&token).await?;

        Ok(AuthUser(auth_context))
    }
}

/// Organization-scoped authenticated user extractor.
///
/// Requires both a valid bearer token and a resolvable `x-organization-id`
/// header naming an organization the caller belongs to. Every org-level
/// route uses this; requests lacking a resolvable organization context are
/// rejected before any handler logic runs.
#[derive(Debug)]
pub struct OrgScoped {
    pub auth: AuthContext,
    pub org: OrgContext,
}

impl<S> FromRequestParts<S> for OrgScoped
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(auth) = AuthUser::from_request_parts(parts, state).await?;

        let header = parts
            .headers
            .get(ORG_HEADER)
            .ok_or(AuthError::MissingOrgContext)?;
        let org_id: Uuid = header
            .to_str()
            .map_err(|_| AuthError::InvalidOrgContext)?
            .parse()
            .map_err(|_| AuthError::InvalidOrgContext)?;

        let backend = AuthBackend::from_ref(state);
        let org = backend
            .resolve_membership(auth.user.id, org_id)
            .await?
            .ok_or(AuthError::NotOrgMember)?;

        Ok(OrgScoped { auth, org })
    }
}

/// Platform-operator extractor.
///
/// Like `AuthUser` but rejects users without the platform-operator flag
/// with 403 FORBIDDEN. All `/platform/*` routes use this; they are not
/// organization-scoped.
#[derive(Debug)]
pub struct PlatformOperator(pub AuthContext);

impl<S> FromRequestParts<S> for PlatformOperator
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(auth_context) = AuthUser::from_request_parts(parts, state).await?;

        if !auth_context.is_platform_operator() {
            return Err(AuthError::NotPlatformOperator);
        }

        Ok(PlatformOperator(auth_context))
    }
}
