//! Access domain API layer

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::AccessState;
pub use routes::routes;
