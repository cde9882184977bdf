use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use stockkeep_inventory::InventoryItem;

use crate::app::errors;

pub const JSON_CONTENT_TYPE: &str = "application/json";

// -------------------------
// Request DTOs
// -------------------------

/// Query parameters accepted by `GET /inventory`.
#[derive(Debug, Default, Deserialize)]
pub struct ListInventoryQuery {
    pub supplier_name: Option<String>,
    pub product_name: Option<String>,
    pub supplier_id: Option<String>,
}

/// JSON request body.
///
/// Unlike `axum::Json`, both rejections (wrong media type, unparsable body)
/// are rendered as the service's JSON error body.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            let got = req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            return Err(errors::json_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Content-Type must be {JSON_CONTENT_TYPE} (got {got})"),
            ));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            errors::json_error(StatusCode::BAD_REQUEST, format!("failed to read request body: {e}"))
        })?;

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            errors::json_error(StatusCode::BAD_REQUEST, format!("request body is not valid JSON: {e}"))
        })?;

        Ok(Self(value))
    }
}

/// Query string parameters.
///
/// Wraps `axum::extract::Query`; a query string that does not deserialize
/// (e.g. a repeated key) is a 400 with the service's JSON error body.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}

/// Single path parameter, kept as raw text for the handler to parse.
///
/// A segment that cannot even be decoded (invalid percent-encoding or UTF-8)
/// addresses nothing: 404 with the JSON error body.
#[derive(Debug)]
pub struct PathParam(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for PathParam
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "undecodable path parameter");
                Err(errors::not_found(format!(
                    "The requested URL {} was not found on the server.",
                    parts.uri.path()
                )))
            }
        }
    }
}

/// `application/json`, optionally with parameters (`; charset=utf-8`).
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
        .unwrap_or(false)
}

// -------------------------
// Response mapping
// -------------------------

pub fn items_to_json(items: &[InventoryItem]) -> Value {
    Value::Array(items.iter().map(InventoryItem::to_json).collect())
}

/// Absolute URL for `path` when the request named its host, the bare path otherwise.
pub fn external_url(headers: &HeaderMap, path: &str) -> String {
    match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => format!("http://{host}{path}"),
        None => path.to_string(),
    }
}
