//! Catalog operations as exposed to transports.
//!
//! Each method runs one repository call and wraps its failure with the operation
//! name. Two creates have side effects once the write has succeeded:
//! - creating a flash sale event broadcasts an [`EventAnnouncement`]
//! - creating a product discount fans a [`DiscountAlert`] out to every subscriber
//!
//! Delivery failures are logged and never undo or fail the write, and neither does a
//! sale price that cannot be represented. Failing to load the product or discount
//! for the alert does fail the call.

use std::sync::Arc;

use tracing::{instrument, warn};

use flashsale_catalog::{
    Discount, DiscountFilter, FlashSaleEvent, FlashSaleEventFilter, FlashSaleEventProduct,
    FlashSaleEventProductFilter, NewDiscount, NewFlashSaleEvent, NewFlashSaleEventProduct,
    NewProduct, NewProductDiscount, Product, ProductDiscount, ProductDiscountFilter,
    ProductFilter,
};
use flashsale_core::{DomainError, EntityId, ErrorKind, Listing, Page};

use crate::notify::{DiscountAlert, EventAnnouncement, Notifier};
use crate::store::{Repository, Storage};

/// A failed catalog operation: `"failed to <operation>: <cause>"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to {operation}: {source}")]
pub struct ServiceError {
    pub operation: &'static str,
    #[source]
    pub source: DomainError,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    fn during(operation: &'static str) -> impl FnOnce(DomainError) -> Self {
        move |source| Self { operation, source }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone)]
pub struct CatalogService {
    storage: Storage,
    notifier: Arc<Notifier>,
}

impl CatalogService {
    pub fn new(storage: Storage, notifier: Arc<Notifier>) -> Self {
        Self { storage, notifier }
    }

    // ---- products ----

    #[instrument(skip(self, new), err)]
    pub async fn create_product(&self, new: NewProduct) -> ServiceResult<Product> {
        self.storage
            .products()
            .create(new)
            .await
            .map_err(ServiceError::during("create product"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_product(&self, id: &EntityId) -> ServiceResult<Product> {
        self.storage
            .products()
            .get(id)
            .await
            .map_err(ServiceError::during("get product"))
    }

    #[instrument(skip(self, product), fields(id = %product.id), err)]
    pub async fn update_product(&self, product: Product) -> ServiceResult<Product> {
        self.storage
            .products()
            .update(product)
            .await
            .map_err(ServiceError::during("update product"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_product(&self, id: &EntityId) -> ServiceResult<&'static str> {
        self.storage
            .products()
            .delete(id)
            .await
            .map_err(ServiceError::during("delete product"))?;
        Ok("Product deleted successfully")
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> ServiceResult<Listing<Product>> {
        self.storage
            .products()
            .list(filter, page)
            .await
            .map_err(ServiceError::during("list products"))
    }

    // ---- discounts ----

    #[instrument(skip(self, new), err)]
    pub async fn create_discount(&self, new: NewDiscount) -> ServiceResult<Discount> {
        self.storage
            .discounts()
            .create(new)
            .await
            .map_err(ServiceError::during("create discount"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_discount(&self, id: &EntityId) -> ServiceResult<Discount> {
        self.storage
            .discounts()
            .get(id)
            .await
            .map_err(ServiceError::during("get discount"))
    }

    #[instrument(skip(self, discount), fields(id = %discount.id), err)]
    pub async fn update_discount(&self, discount: Discount) -> ServiceResult<Discount> {
        self.storage
            .discounts()
            .update(discount)
            .await
            .map_err(ServiceError::during("update discount"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_discount(&self, id: &EntityId) -> ServiceResult<&'static str> {
        self.storage
            .discounts()
            .delete(id)
            .await
            .map_err(ServiceError::during("delete discount"))?;
        Ok("Discount deleted successfully")
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list_discounts(
        &self,
        filter: &DiscountFilter,
        page: Page,
    ) -> ServiceResult<Listing<Discount>> {
        self.storage
            .discounts()
            .list(filter, page)
            .await
            .map_err(ServiceError::during("list discounts"))
    }

    // ---- flash sale events ----

    #[instrument(skip(self, new), err)]
    pub async fn create_flash_sale_event(
        &self,
        new: NewFlashSaleEvent,
    ) -> ServiceResult<FlashSaleEvent> {
        let event = self
            .storage
            .flash_sale_events()
            .create(new)
            .await
            .map_err(ServiceError::during("create flash sale event"))?;

        let announcement = EventAnnouncement::for_event(&event);
        if let Err(err) = self.notifier.broadcast(&announcement.to_string()).await {
            warn!(event_id = %event.id, error = %err, "failed to send notification");
        }

        Ok(event)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_flash_sale_event(&self, id: &EntityId) -> ServiceResult<FlashSaleEvent> {
        self.storage
            .flash_sale_events()
            .get(id)
            .await
            .map_err(ServiceError::during("get flash sale event"))
    }

    /// Only events that have not started (and are not ENDED) can be updated; any
    /// other row reports `NotFound`.
    #[instrument(skip(self, event), fields(id = %event.id), err)]
    pub async fn update_flash_sale_event(
        &self,
        event: FlashSaleEvent,
    ) -> ServiceResult<FlashSaleEvent> {
        self.storage
            .flash_sale_events()
            .update(event)
            .await
            .map_err(ServiceError::during("update flash sale event"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_flash_sale_event(&self, id: &EntityId) -> ServiceResult<&'static str> {
        self.storage
            .flash_sale_events()
            .delete(id)
            .await
            .map_err(ServiceError::during("delete flash sale event"))?;
        Ok("Flash sale event deleted successfully")
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list_flash_sale_events(
        &self,
        filter: &FlashSaleEventFilter,
        page: Page,
    ) -> ServiceResult<Listing<FlashSaleEvent>> {
        self.storage
            .flash_sale_events()
            .list(filter, page)
            .await
            .map_err(ServiceError::during("list flash sale events"))
    }

    // ---- product discounts ----

    #[instrument(skip(self, new), err)]
    pub async fn create_product_discount(
        &self,
        new: NewProductDiscount,
    ) -> ServiceResult<ProductDiscount> {
        let link = self
            .storage
            .product_discounts()
            .create(new)
            .await
            .map_err(ServiceError::during("create product discount"))?;

        let (product, discount) = self.alert_subjects(&link).await?;
        let alert = match DiscountAlert::compose(&product, &discount) {
            Ok(alert) => alert,
            Err(err) => {
                warn!(product_discount_id = %link.id, error = %err, "discount alert not sent");
                return Ok(link);
            }
        };

        match self.notifier.fanout(&alert.to_string()).await {
            Ok(reached) => {
                tracing::debug!(product_discount_id = %link.id, reached, "discount alert sent");
            }
            Err(err) => {
                warn!(product_discount_id = %link.id, error = %err, "failed to send notification");
            }
        }

        Ok(link)
    }

    /// The alert a product discount announces, priced from the product's base price.
    pub async fn discount_alert(&self, link: &ProductDiscount) -> ServiceResult<DiscountAlert> {
        let (product, discount) = self.alert_subjects(link).await?;
        DiscountAlert::compose(&product, &discount)
            .map_err(ServiceError::during("price discount alert"))
    }

    async fn alert_subjects(&self, link: &ProductDiscount) -> ServiceResult<(Product, Discount)> {
        let product = self
            .storage
            .products()
            .get(&link.product_id)
            .await
            .map_err(ServiceError::during("get product for notification"))?;
        let discount = self
            .storage
            .discounts()
            .get(&link.discount_id)
            .await
            .map_err(ServiceError::during("get discount for notification"))?;

        Ok((product, discount))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_product_discount(&self, id: &EntityId) -> ServiceResult<ProductDiscount> {
        self.storage
            .product_discounts()
            .get(id)
            .await
            .map_err(ServiceError::during("get product discount"))
    }

    #[instrument(skip(self, link), fields(id = %link.id), err)]
    pub async fn update_product_discount(
        &self,
        link: ProductDiscount,
    ) -> ServiceResult<ProductDiscount> {
        self.storage
            .product_discounts()
            .update(link)
            .await
            .map_err(ServiceError::during("update product discount"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_product_discount(&self, id: &EntityId) -> ServiceResult<&'static str> {
        self.storage
            .product_discounts()
            .delete(id)
            .await
            .map_err(ServiceError::during("delete product discount"))?;
        Ok("Product discount deleted successfully")
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list_product_discounts(
        &self,
        filter: &ProductDiscountFilter,
        page: Page,
    ) -> ServiceResult<Listing<ProductDiscount>> {
        self.storage
            .product_discounts()
            .list(filter, page)
            .await
            .map_err(ServiceError::during("list product discounts"))
    }

    // ---- flash sale event products ----

    #[instrument(skip(self, new), fields(event_id = %new.event_id), err)]
    pub async fn create_flash_sale_event_product(
        &self,
        new: NewFlashSaleEventProduct,
    ) -> ServiceResult<FlashSaleEventProduct> {
        self.storage
            .flash_sale_event_products()
            .create(new)
            .await
            .map_err(ServiceError::during("create flash sale event product"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_flash_sale_event_product(
        &self,
        id: &EntityId,
    ) -> ServiceResult<FlashSaleEventProduct> {
        self.storage
            .flash_sale_event_products()
            .get(id)
            .await
            .map_err(ServiceError::during("get flash sale event product"))
    }

    #[instrument(skip(self, row), fields(id = %row.id, event_id = %row.event_id), err)]
    pub async fn update_flash_sale_event_product(
        &self,
        row: FlashSaleEventProduct,
    ) -> ServiceResult<FlashSaleEventProduct> {
        self.storage
            .flash_sale_event_products()
            .update(row)
            .await
            .map_err(ServiceError::during("update flash sale event product"))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_flash_sale_event_product(
        &self,
        id: &EntityId,
    ) -> ServiceResult<&'static str> {
        self.storage
            .flash_sale_event_products()
            .delete(id)
            .await
            .map_err(ServiceError::during("delete flash sale event product"))?;
        Ok("Flash sale event product deleted successfully")
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list_flash_sale_event_products(
        &self,
        filter: &FlashSaleEventProductFilter,
        page: Page,
    ) -> ServiceResult<Listing<FlashSaleEventProduct>> {
        self.storage
            .flash_sale_event_products()
            .list(filter, page)
            .await
            .map_err(ServiceError::during("list flash sale event products"))
    }
}
