//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    UserLoadError,
    AuthenticationFailed,
    /// Request did not carry an `x-organization-id` header
    MissingOrgContext,
    /// The organization-scoping header is not a valid id
    InvalidOrgContext,
    /// The authenticated user has no membership in the scoped organization
    NotOrgMember,
    /// Platform routes require the platform-operator flag
    NotPlatformOperator,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::UserLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_LOAD_ERROR",
                "Failed to load user",
            ),
            AuthError::AuthenticationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Authentication failed",
            ),
            AuthError::MissingOrgContext => (
                StatusCode::BAD_REQUEST,
                "MISSING_ORG_CONTEXT",
                "x-organization-id header required",
            ),
            AuthError::InvalidOrgContext => (
                StatusCode::BAD_REQUEST,
                "INVALID_ORG_CONTEXT",
                "x-organization-id header is not a valid organization id",
            ),
            AuthError::NotOrgMember => (
                StatusCode::FORBIDDEN,
                "NOT_ORG_MEMBER",
                "Not a member of the scoped organization",
            ),
            AuthError::NotPlatformOperator => (
                StatusCode::FORBIDDEN,
                "NOT_PLATFORM_OPERATOR",
                "Platform operator access required",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_context_errors_are_client_errors() {
        assert_eq!(
            AuthError::MissingOrgContext.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidOrgContext.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::NotOrgMember.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_platform_gate_is_forbidden() {
        assert_eq!(
            AuthError::NotPlatformOperator.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(
            AuthError::MissingAuthorization.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
