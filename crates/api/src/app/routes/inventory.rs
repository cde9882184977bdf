use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use stockkeep_inventory::{InventoryFilter, InventoryItem, InventoryItemId};

use crate::app::dto::{self, JsonBody, PathParam, QueryParams};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/inventory",
            get(list_items)
                .post(create_item)
                .fallback(errors::method_not_allowed),
        )
        .route(
            "/inventory/supplier/:supplier_id",
            put(toggle_supplier_status).fallback(errors::method_not_allowed),
        )
        .route(
            "/inventory/:id",
            get(get_item)
                .put(update_item)
                .delete(delete_item)
                .fallback(errors::method_not_allowed),
        )
}

/// Path ids that are not integers address nothing.
fn parse_item_id(raw: &str) -> Result<InventoryItemId, axum::response::Response> {
    raw.parse::<InventoryItemId>().map_err(|_| {
        errors::not_found(format!("Inventory item with id '{raw}' was not found."))
    })
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    QueryParams(query): QueryParams<dto::ListInventoryQuery>,
) -> axum::response::Response {
    tracing::info!("request for inventory list");

    let filter = match InventoryFilter::from_query(
        query.supplier_name.as_deref(),
        query.product_name.as_deref(),
        query.supplier_id.as_deref(),
    ) {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let repo = services.repository();
    let items = match &filter {
        Some(filter) => repo.find_by(filter).await,
        None => repo.all().await,
    };

    match items {
        Ok(items) => {
            tracing::info!(count = items.len(), filter = ?filter, "returning inventory items");
            (StatusCode::OK, Json(dto::items_to_json(&items))).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    PathParam(id): PathParam,
) -> axum::response::Response {
    tracing::info!(id = %id, "request for inventory item");

    let id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.repository().find_or_not_found(id).await {
        Ok(item) => (StatusCode::OK, Json(item.to_json())).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    JsonBody(body): JsonBody,
) -> axum::response::Response {
    tracing::info!("request to create inventory item");

    let item = match InventoryItem::from_json(&body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let created = match services.repository().create(item).await {
        Ok(c) => c,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let Some(id) = created.id else {
        return errors::repository_error_to_response(stockkeep_infra::RepositoryError::Unpersisted);
    };
    tracing::info!(id = %id, product_name = %created.product_name, "inventory item created");

    let location = dto::external_url(&headers, &format!("/inventory/{id}"));
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created.to_json()),
    )
        .into_response()
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    PathParam(id): PathParam,
    JsonBody(body): JsonBody,
) -> axum::response::Response {
    tracing::info!(id = %id, "request to update inventory item");

    let id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let repo = services.repository();
    let mut item = match repo.find_or_not_found(id).await {
        Ok(item) => item,
        Err(e) => return errors::repository_error_to_response(e),
    };

    if let Err(e) = item.update_from_json(&body) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = repo.save(&item).await {
        return errors::repository_error_to_response(e);
    }

    tracing::info!(id = %id, "inventory item updated");
    (StatusCode::OK, Json(item.to_json())).into_response()
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<PathParam, axum::response::Response>,
) -> axum::response::Response {
    // Deleting something that cannot exist is still a successful delete.
    let Ok(PathParam(id)) = id else {
        return StatusCode::NO_CONTENT.into_response();
    };
    tracing::info!(id = %id, "request to delete inventory item");

    let Ok(id) = id.parse::<InventoryItemId>() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match services.repository().delete(id).await {
        Ok(()) => {
            tracing::info!(id = %id, "inventory item deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

/// Flip `supplier_status` on every item of one supplier.
pub async fn toggle_supplier_status(
    Extension(services): Extension<Arc<AppServices>>,
    PathParam(supplier_id): PathParam,
) -> axum::response::Response {
    tracing::info!(supplier_id = %supplier_id, "request to toggle supplier status");

    let Ok(supplier_id) = supplier_id.parse::<i32>() else {
        return errors::not_found(format!(
            "Inventory items with supplier id '{supplier_id}' were not found."
        ));
    };

    match services.repository().toggle_supplier_status(supplier_id).await {
        Ok(items) => {
            tracing::info!(supplier_id, count = items.len(), "supplier status toggled");
            (StatusCode::OK, Json(dto::items_to_json(&items))).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}
