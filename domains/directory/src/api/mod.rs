//! Directory domain API layer

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::DirectoryState;
pub use routes::routes;
