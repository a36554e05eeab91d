//! Storage domain API layer

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::StorageState;
pub use routes::routes;
