use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::app::dto;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Root URL: service name, version and where the collection lives.
pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let info = services.info();
    Json(serde_json::json!({
        "name": info.name,
        "version": info.version,
        "paths": dto::external_url(&headers, "/inventory"),
    }))
}
