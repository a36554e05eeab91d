//! Auth read-model types
//!
//! Lightweight views of the same DB rows owned by the directory domain.
//! These types carry only the fields needed for authentication and
//! organization scoping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lightweight identity for authenticated users.
///
/// Handlers needing the full `User` record should load it from the
/// directory domain's repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub is_platform_operator: bool,
    pub created_at: DateTime<Utc>,
}
