//! Route definitions for the audit domain API

use axum::{routing::get, Router};

use super::handlers::audit_logs;
use super::middleware::AuditState;

/// Create all audit domain API routes
pub fn routes() -> Router<AuditState> {
    Router::new().route("/v1/platform/audit-logs", get(audit_logs::list_audit_logs))
}
