use axum::{routing::get, Router};

use crate::app::errors;

pub mod inventory;
pub mod system;

/// Router for every endpoint (state is attached by the caller).
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::index).fallback(errors::method_not_allowed))
        .route("/health", get(system::health).fallback(errors::method_not_allowed))
        .merge(inventory::router())
        .fallback(errors::unknown_route)
}
