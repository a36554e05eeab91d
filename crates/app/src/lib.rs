//! VFX.sh admin core application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use vfxsh_access::api::AccessState;
use vfxsh_audit::api::AuditState;
use vfxsh_auth::{AuthBackend, AuthConfig};
use vfxsh_common::config::Config;
use vfxsh_directory::api::DirectoryState;
use vfxsh_storage::api::StorageState;
use vfxsh_storage::HttpStorageGateway;

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: std::env::var("JWT_ISSUER").ok(),
        audience: std::env::var("JWT_AUDIENCE").ok(),
    };
    let auth = AuthBackend::new(pool.clone(), auth_config);
    let gateway = Arc::new(HttpStorageGateway::new(config.gateway_url.clone()));

    let access_state = AccessState::new(pool.clone(), auth.clone());
    let directory_state = DirectoryState::new(pool.clone(), auth.clone());
    let storage_state = StorageState::new(pool.clone(), auth.clone(), gateway);
    let audit_state = AuditState::new(pool, auth);

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "VFX.sh Admin API v0.1.0" }),
        )
        .merge(vfxsh_access::api::routes().with_state(access_state))
        .merge(vfxsh_directory::api::routes().with_state(directory_state))
        .merge(vfxsh_storage::api::routes().with_state(storage_state))
        .merge(vfxsh_audit::api::routes().with_state(audit_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
