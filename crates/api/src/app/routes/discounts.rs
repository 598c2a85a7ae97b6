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

use flashsale_catalog::{Discount, DiscountFilter, NewDiscount};
use flashsale_core::{EntityId, Record, RecordMeta};
use flashsale_infra::CatalogService;

use crate::app::routes::common::{self, PageParams};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_discount).get(list_discounts))
        .route("/:id", get(get_discount).put(update_discount).delete(delete_discount))
}

pub async fn create_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    payload: Result<Json<NewDiscount>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    common::respond(StatusCode::CREATED, services.create_discount(new).await)
}

pub async fn list_discounts(
    Extension(services): Extension<Arc<CatalogService>>,
    filter: Result<Query<DiscountFilter>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let (filter, params) = match (common::query(filter), common::query(params)) {
        (Ok(f), Ok(p)) => (f, p),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    common::respond_listing(services.list_discounts(&filter, params.page()).await)
}

pub async fn get_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond(StatusCode::OK, services.get_discount(&EntityId::new(id)).await)
}

pub async fn update_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
    payload: Result<Json<NewDiscount>, JsonRejection>,
) -> Response {
    let new = match common::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let discount = Discount::assemble(EntityId::new(id), new, RecordMeta::default());
    common::respond(StatusCode::OK, services.update_discount(discount).await)
}

pub async fn delete_discount(
    Extension(services): Extension<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    common::respond_deleted(services.delete_discount(&EntityId::new(id)).await)
}
