//! Common error types and handling for the VFX.sh admin core

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the admin core.
///
/// `Forbidden` and `Conflict` carry a machine-readable reason code and the
/// offending resource id so the console can render an actionable message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Forbidden: {reason}")]
    Forbidden {
        reason: String,
        resource: Option<String>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        resource: Option<String>,
    },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Forbidden without an offending resource
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Error::Forbidden {
            reason: reason.into(),
            resource: None,
        }
    }

    /// Forbidden scoped to a specific resource
    pub fn forbidden_on(reason: impl Into<String>, resource: impl Into<String>) -> Self {
        Error::Forbidden {
            reason: reason.into(),
            resource: Some(resource.into()),
        }
    }

    /// Conflict without an offending resource
    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict {
            message: message.into(),
            resource: None,
        }
    }

    /// Conflict scoped to a specific resource
    pub fn conflict_on(message: impl Into<String>, resource: impl Into<String>) -> Self {
        Error::Conflict {
            message: message.into(),
            resource: Some(resource.into()),
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Authentication(_) => "AUTHENTICATION_ERROR",
            Error::Forbidden { .. } => "FORBIDDEN",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict { .. } => "CONFLICT",
            Error::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Log internal errors with full context
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = match &self {
            Error::Forbidden { reason, resource } => Json(json!({
                "error": {
                    "code": error_code,
                    "message": self.to_string(),
                    "reason": reason,
                    "resource": resource,
                }
            })),
            Error::Conflict { message, resource } => Json(json!({
                "error": {
                    "code": error_code,
                    "message": message,
                    "resource": resource,
                }
            })),
            _ => Json(json!({
                "error": {
                    "code": error_code,
                    "message": self.to_string(),
                }
            })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::Authentication("test".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::forbidden("insufficient_role").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Validation("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(Error::conflict("test").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::UpstreamUnavailable("gateway down".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::Authentication("test".to_string()).error_code(),
            "AUTHENTICATION_ERROR"
        );
        assert_eq!(
            Error::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(Error::conflict("test").error_code(), "CONFLICT");
        assert_eq!(
            Error::forbidden("insufficient_bucket_acl").error_code(),
            "FORBIDDEN"
        );
        assert_eq!(
            Error::UpstreamUnavailable("test".to_string()).error_code(),
            "UPSTREAM_UNAVAILABLE"
        );
    }

    #[test]
    fn test_forbidden_carries_reason_and_resource() {
        let err = Error::forbidden_on("insufficient_bucket_acl", "dailies");
        match err {
            Error::Forbidden { reason, resource } => {
                assert_eq!(reason, "insufficient_bucket_acl");
                assert_eq!(resource.as_deref(), Some("dailies"));
            }
            _ => panic!("expected Forbidden"),
        }
    }

    #[test]
    fn test_conflict_carries_resource() {
        let err = Error::conflict_on("bucket is referenced by virtual sources", "renders");
        match err {
            Error::Conflict { message, resource } => {
                assert!(message.contains("referenced"));
                assert_eq!(resource.as_deref(), Some("renders"));
            }
            _ => panic!("expected Conflict"),
        }
    }
}
