//! Catalog domain module.
//!
//! Products, discounts, flash sale events and the two join records that bind them,
//! together with the pricing rules and the lifecycle gate for flash sale inventory.
//! Deterministic domain logic only (no IO, no HTTP, no storage).

pub mod discount;
pub mod flash_sale_event;
pub mod flash_sale_event_product;
pub mod lifecycle;
pub mod pricing;
pub mod product;
pub mod product_discount;

pub use discount::{Discount, DiscountFilter, DiscountType, NewDiscount};
pub use flash_sale_event::{EventStatus, EventType, FlashSaleEvent, FlashSaleEventFilter, NewFlashSaleEvent};
pub use flash_sale_event_product::{
    FlashSaleEventProduct, FlashSaleEventProductFilter, NewFlashSaleEventProduct,
};
pub use lifecycle::ensure_open_for_inventory;
pub use pricing::{apply_discount, describe_discount};
pub use product::{NewProduct, Product, ProductFilter};
pub use product_discount::{NewProductDiscount, ProductDiscount, ProductDiscountFilter};

use flashsale_core::{DomainError, DomainResult, EntityId};
use rust_decimal::Decimal;

pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn require_reference(field: &str, value: &EntityId) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: Decimal) -> DomainResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(())
}
