use axum::Router;

pub mod common;
pub mod discounts;
pub mod flash_sale_event_products;
pub mod flash_sale_events;
pub mod product_discounts;
pub mod products;
pub mod system;

/// Router for every catalog resource.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/discounts", discounts::router())
        .nest("/flash-sale-events", flash_sale_events::router())
        .nest("/product-discounts", product_discounts::router())
        .nest("/flash-sale-event-products", flash_sale_event_products::router())
}
