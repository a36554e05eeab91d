//! Route definitions for the access domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{checks, group_acls, matrices, user_acls};
use super::middleware::AccessState;

fn matrix_routes() -> Router<AccessState> {
    Router::new()
        .route("/v1/acls/users", get(matrices::user_acl_matrix))
        .route("/v1/acls/groups", get(matrices::group_acl_matrix))
}

fn user_acl_routes() -> Router<AccessState> {
    Router::new()
        .route(
            "/v1/users/{id}/acl",
            get(user_acls::get_user_acl).put(user_acls::replace_user_acl),
        )
        .route("/v1/users/{id}/access", post(user_acls::set_user_access))
        .route(
            "/v1/users/{id}/access/{bucket}",
            delete(user_acls::remove_user_access),
        )
}

fn group_acl_routes() -> Router<AccessState> {
    Router::new()
        .route("/v1/groups/{id}/access", post(group_acls::set_group_access))
        .route(
            "/v1/groups/{id}/access/{bucket}",
            delete(group_acls::remove_group_access),
        )
}

fn check_routes() -> Router<AccessState> {
    Router::new().route("/v1/access/check", post(checks::check_access))
}

/// Create all access domain API routes
pub fn routes() -> Router<AccessState> {
    Router::new()
        .merge(matrix_routes())
        .merge(user_acl_routes())
        .merge(group_acl_routes())
        .merge(check_routes())
}
