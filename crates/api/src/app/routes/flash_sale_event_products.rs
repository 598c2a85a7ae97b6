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

use flashsale_catalog::{FlashSaleEventProduct, FlashSaleEventProductFilter, NewFlashSaleEventProduct};
use flashsale_core::{EntityId, Record, RecordMeta};
use flashsale_infra::CatalogService;

use crate::app::routes::common::{self, PageParams};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_flash_sale_event_product).get(list_flash_sale_event_products))
        .route("/:id", get(get_flash_sale_event_product).put(update_flash_sale_event_product).delete(delete_flash_sale_event_product))
}

pub async fn create_flash_sale_event_product(
    Extension(services): Extension<Arc<CatalogService>>,
    payload: Result<Json<NewFlashSaleEventProduct>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.create_flash_sale_event_product(new).await)
}

pub async fn list_flash_sale_event_products(
    Extension(services): Extension<Arc<CatalogService>>,
    filter: Result<Query<FlashSaleEventProductFilter>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let (filter, params) = match (common::query(filter), common::query(params)) {
        (Ok(f), Ok(p)) => (f, p),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    common::respond_listing(services.list_flash_sale_event_products(&filter, params.page()).await)
}

pub async fn get_flash_sale_event_product(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond(StatusCode::OK, services.get_flash_sale_event_product(&EntityId::new(id)).await)
}

/// Rejected with 422 once the referenced event has ended or expired.
pub async fn update_flash_sale_event_product(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
    payload: Result<Json<NewFlashSaleEventProduct>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let row = FlashSaleEventProduct::assemble(EntityId::new(id), new, RecordMeta::default());
    common::respond(StatusCode::OK, services.update_flash_sale_event_product(row).await)
}

pub async fn delete_flash_sale_event_product(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond_deleted(services.delete_flash_sale_event_product(&EntityId::new(id)).await)
}
