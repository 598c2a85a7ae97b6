//! Product CRUD and listing (`name`, `description`, `min_price`, `max_price`).

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use flashsale_catalog::{Product, ProductFilter, NewProduct};
use flashsale_core::{EntityId, Record, RecordMeta};
use flashsale_infra::CatalogService;

use crate::app::routes::common::{self, PageParams};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<CatalogService>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.create_product(new).await)
}

pub async fn list_products(
    Extension(services): Extension<Arc<CatalogService>>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let (filter, params) = match (common::query(filter), common::query(params)) {
        (Ok(f), Ok(p)) => (f, p),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    common::respond_listing(services.list_products(&filter, params.page()).await)
}

pub async fn get_product(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond(StatusCode::OK, services.get_product(&EntityId::new(id)).await)
}

/// Full replace of the settable columns; an `id` in the body is ignored.
pub async fn update_product(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product = Product::assemble(EntityId::new(id), new, RecordMeta::default());
    common::respond(StatusCode::OK, services.update_product(product).await)
}

pub async fn delete_product(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond_deleted(services.delete_product(&EntityId::new(id)).await)
}
