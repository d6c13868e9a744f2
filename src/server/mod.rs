//! Axum-based HTTP server.
//!
//! The server layer is deliberately thin: handlers validate query
//! parameters, delegate to the transform service, and translate the
//! outcome into HTTP responses. All pipeline decisions live in
//! [`crate::transform`].

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, meta_handler, transform_handler, AppState, ErrorResponse, HealthResponse,
    MetaResponse,
};
pub use routes::{create_router, RouterConfig, DEFAULT_CACHE_MAX_AGE};
