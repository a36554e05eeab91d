//! Audit log entities
//!
//! An entry records who did what, to which resource, under which
//! organization scope. Actions are namespaced strings such as
//! `bucket:create` or `acl:set` so the console can filter by prefix.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use uuid::Uuid;

/// Persisted audit log entry (append-only, immutable once written)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub org_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<Json<serde_json::Value>>,
    pub ip_address: Option<String>,
}

/// Input for recording a new entry
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub org_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

impl NewAuditEntry {
    /// Minimal entry for an org-scoped action on a named resource
    pub fn org_action(
        user_id: Uuid,
        user_email: impl Into<String>,
        org_id: Uuid,
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            user_email: Some(user_email.into()),
            org_id: Some(org_id),
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: Some(resource_id.into()),
            details: None,
            ip_address: None,
        }
    }

    /// Minimal entry for a platform-level action (no org scope)
    pub fn platform_action(
        user_id: Uuid,
        user_email: impl Into<String>,
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            user_email: Some(user_email.into()),
            org_id: None,
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: Some(resource_id.into()),
            details: None,
            ip_address: None,
        }
    }

    /// Attach free-form details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_action_builder() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let entry = NewAuditEntry::org_action(
            user_id,
            "td@studio.example",
            org_id,
            "bucket:create",
            "bucket",
            "dailies",
        );
        assert_eq!(entry.org_id, Some(org_id));
        assert_eq!(entry.action, "bucket:create");
        assert_eq!(entry.resource_id.as_deref(), Some("dailies"));
        assert!(entry.details.is_none());
    }

    #[test]
    fn test_platform_action_has_no_org() {
        let entry = NewAuditEntry::platform_action(
            Uuid::new_v4(),
            "ops@vfx.sh",
            "provider:create",
            "provider",
            "wasabi-eu",
        );
        assert!(entry.org_id.is_none());
    }

    #[test]
    fn test_with_details() {
        let entry = NewAuditEntry::platform_action(
            Uuid::new_v4(),
            "ops@vfx.sh",
            "org:delete",
            "organization",
            "abc",
        )
        .with_details(serde_json::json!({"cascade": true}));
        assert!(entry.details.is_some());
    }
}
