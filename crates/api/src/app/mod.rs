//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository wiring (in-memory or Postgres)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request parsing and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around already-wired services.
pub fn build_app(services: services::AppServices) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_logging))
            .layer(Extension(Arc::new(services))),
    )
}
