//! Audit domain API layer

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::AuditState;
pub use routes::routes;
