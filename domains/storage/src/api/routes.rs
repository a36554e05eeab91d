//! Route definitions for the storage domain API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{buckets, platform, providers, virtual_buckets};
use super::middleware::StorageState;

fn bucket_routes() -> Router<StorageState> {
    Router::new()
        .route(
            "/v1/buckets",
            get(buckets::list_buckets).post(buckets::create_bucket),
        )
        .route("/v1/buckets/{name}", delete(buckets::delete_bucket))
        .route("/v1/buckets/{name}/browse", get(buckets::browse_bucket))
}

fn virtual_bucket_routes() -> Router<StorageState> {
    Router::new()
        .route(
            "/v1/virtual-buckets/{name}",
            get(virtual_buckets::get_virtual_bucket),
        )
        .route(
            "/v1/virtual-buckets/{name}/sources",
            post(virtual_buckets::add_source),
        )
        .route(
            "/v1/virtual-buckets/{name}/sources/{source_id}",
            put(virtual_buckets::update_source).delete(virtual_buckets::remove_source),
        )
}

fn provider_routes() -> Router<StorageState> {
    Router::new().route("/v1/providers", get(providers::list_providers))
}

fn platform_routes() -> Router<StorageState> {
    Router::new()
        .route(
            "/v1/platform/providers",
            get(platform::list_providers).post(platform::create_provider),
        )
        .route(
            "/v1/platform/providers/{id}",
            put(platform::update_provider).delete(platform::delete_provider),
        )
        .route(
            "/v1/platform/buckets",
            get(platform::list_buckets).post(platform::create_bucket),
        )
        .route(
            "/v1/platform/buckets/{org_id}/{name}",
            delete(platform::delete_bucket),
        )
        .route(
            "/v1/platform/assignments",
            get(platform::list_assignments).post(platform::create_assignment),
        )
        .route(
            "/v1/platform/assignments/{id}",
            delete(platform::delete_assignment),
        )
        .route("/v1/platform/locks", get(platform::list_locks))
}

/// Create all storage domain API routes
pub fn routes() -> Router<StorageState> {
    Router::new()
        .merge(bucket_routes())
        .merge(virtual_bucket_routes())
        .merge(provider_routes())
        .merge(platform_routes())
}
