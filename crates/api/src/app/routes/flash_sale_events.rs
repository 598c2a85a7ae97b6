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

use flashsale_catalog::{FlashSaleEvent, FlashSaleEventFilter, NewFlashSaleEvent};
use flashsale_core::{EntityId, Record, RecordMeta};
use flashsale_infra::CatalogService;

use crate::app::routes::common::{self, PageParams};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_flash_sale_event).get(list_flash_sale_events))
        .route("/:id", get(get_flash_sale_event).put(update_flash_sale_event).delete(delete_flash_sale_event))
}

/// Creates the event and broadcasts its announcement.
pub async fn create_flash_sale_event(
    Extension(services): Extension<Arc<CatalogService>>,
    payload: Result<Json<NewFlashSaleEvent>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.create_flash_sale_event(new).await)
}

pub async fn list_flash_sale_events(
    Extension(services): Extension<Arc<CatalogService>>,
    filter: Result<Query<FlashSaleEventFilter>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let (filter, params) = match (common::query(filter), common::query(params)) {
        (Ok(f), Ok(p)) => (f, p),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    common::respond_listing(services.list_flash_sale_events(&filter, params.page()).await)
}

pub async fn get_flash_sale_event(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond(StatusCode::OK, services.get_flash_sale_event(&EntityId::new(id)).await)
}

/// Only events that have not started yet can be replaced; others answer 404.
pub async fn update_flash_sale_event(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
    payload: Result<Json<NewFlashSaleEvent>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let event = FlashSaleEvent::assemble(EntityId::new(id), new, RecordMeta::default());
    common::respond(StatusCode::OK, services.update_flash_sale_event(event).await)
}

pub async fn delete_flash_sale_event(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond_deleted(services.delete_flash_sale_event(&EntityId::new(id)).await)
}
