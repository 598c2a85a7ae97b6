//! Response shaping shared by the entity routers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use flashsale_core::{Listing, Page};
use flashsale_infra::ServiceResult;

use crate::app::errors;

/// `page` / `limit` query parameters; missing or non-positive values use the defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page::from_params(self.page, self.limit)
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

impl<T> From<Listing<T>> for ListResponse<T> {
    fn from(listing: Listing<T>) -> Self {
        Self {
            items: listing.items,
            total: listing.total,
            page: listing.page.page(),
            limit: listing.page.limit(),
            has_more: listing.has_more,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Render a service result with `status` on success.
pub fn respond<T: Serialize>(status: StatusCode, result: ServiceResult<T>) -> Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub fn respond_listing<T: Serialize>(result: ServiceResult<Listing<T>>) -> Response {
    respond(StatusCode::OK, result.map(ListResponse::from))
}

pub fn respond_deleted(result: ServiceResult<&'static str>) -> Response {
    respond(StatusCode::OK, result.map(|message| MessageResponse { message }))
}

pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(value)| value)
        .map_err(errors::json_rejection_to_response)
}

pub fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    params
        .map(|Query(value)| value)
        .map_err(errors::query_rejection_to_response)
}
