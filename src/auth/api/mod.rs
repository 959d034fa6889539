//! HTTP surface for the auth service.

pub mod handlers;
pub mod routes;

pub use routes::create_router;
