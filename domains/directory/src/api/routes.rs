//! Route definitions for the directory domain API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{groups, keys, members, platform, users};
use super::middleware::DirectoryState;

fn member_routes() -> Router<DirectoryState> {
    Router::new()
        .route(
            "/v1/organization/members",
            get(members::list_members).post(members::add_member),
        )
        .route(
            "/v1/organization/members/{user_id}",
            put(members::change_member_role).delete(members::remove_member),
        )
}

fn user_routes() -> Router<DirectoryState> {
    Router::new().route("/v1/users", get(users::list_users))
}

fn group_routes() -> Router<DirectoryState> {
    Router::new()
        .route("/v1/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/v1/groups/{id}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/v1/groups/{id}/members", post(groups::add_group_member))
        .route(
            "/v1/groups/{id}/members/{user_id}",
            delete(groups::remove_group_member),
        )
}

fn key_routes() -> Router<DirectoryState> {
    Router::new()
        .route("/v1/keys", get(keys::list_keys).post(keys::create_key))
        .route(
            "/v1/keys/{id}",
            put(keys::update_key).delete(keys::delete_key),
        )
        .route("/v1/keys/{id}/rotate", post(keys::rotate_key))
}

fn platform_routes() -> Router<DirectoryState> {
    Router::new()
        .route("/v1/platform/status", get(platform::status))
        .route(
            "/v1/platform/organizations",
            get(platform::list_organizations).post(platform::create_organization),
        )
        .route(
            "/v1/platform/organizations/{id}",
            delete(platform::delete_organization),
        )
        .route(
            "/v1/platform/users",
            get(platform::list_users).post(platform::create_user),
        )
        .route("/v1/platform/users/{id}", put(platform::update_user))
}

/// Create all directory domain API routes
pub fn routes() -> Router<DirectoryState> {
    Router::new()
        .merge(member_routes())
        .merge(user_routes())
        .merge(group_routes())
        .merge(key_routes())
        .merge(platform_routes())
}
