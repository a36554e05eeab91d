//! Shared database types for the admin core
//!
//! This module provides common database-related types used across domain
//! repositories.

use crate::error::Error;
use thiserror::Error;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => Error::conflict("Record already exists"),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_repository_error_maps_to_api_error() {
        let err: Error = RepositoryError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: Error = RepositoryError::AlreadyExists.into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: Error = RepositoryError::InvalidData("bad slug".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
