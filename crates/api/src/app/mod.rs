//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: builds the catalog service (storage backend, notifier) from config
//! - `routes/`: HTTP routes + handlers (one file per entity kind)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use flashsale_infra::{CatalogService, Config};

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around an already-wired service.
pub fn build_app(services: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

/// Build the router from runtime configuration (public entrypoint used by `main.rs`).
pub async fn build_app_from_config(config: &Config) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(build_app(services))
}
