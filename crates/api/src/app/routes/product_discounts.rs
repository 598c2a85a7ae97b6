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

use flashsale_catalog::{ProductDiscount, ProductDiscountFilter, NewProductDiscount};
use flashsale_core::{EntityId, Record, RecordMeta};
use flashsale_infra::CatalogService;

use crate::app::routes::common::{self, PageParams};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product_discount).get(list_product_discounts))
        .route("/:id", get(get_product_discount).put(update_product_discount).delete(delete_product_discount))
}

/// Persists the link, then alerts every subscriber. A failed delivery still answers 201.
pub async fn create_product_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    payload: Result<Json<NewProductDiscount>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.create_product_discount(new).await)
}

pub async fn list_product_discounts(
    Extension(services): Extension<Arc<CatalogService>>,
    filter: Result<Query<ProductDiscountFilter>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let (filter, params) = match (common::query(filter), common::query(params)) {
        (Ok(f), Ok(p)) => (f, p),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    common::respond_listing(services.list_product_discounts(&filter, params.page()).await)
}

pub async fn get_product_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond(StatusCode::OK, services.get_product_discount(&EntityId::new(id)).await)
}

pub async fn update_product_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
    payload: Result<Json<NewProductDiscount>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let link = ProductDiscount::assemble(EntityId::new(id), new, RecordMeta::default());
    common::respond(StatusCode::OK, services.update_product_discount(link).await)
}

pub async fn delete_product_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond_deleted(services.delete_product_discount(&EntityId::new(id)).await)
}
