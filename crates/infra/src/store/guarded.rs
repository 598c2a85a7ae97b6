//! Lifecycle gate in front of the flash sale inventory repository.

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use flashsale_catalog::{ensure_open_for_inventory, FlashSaleEvent, FlashSaleEventProduct};
use flashsale_core::{DomainError, DomainResult, EntityId, Listing, Page};

use super::Repository;

/// Adapter that checks the parent event before any inventory write.
///
/// Ordering invariant: the event is fetched and checked **before** the inner
/// repository is touched, so a rejected write never persists anything.
pub struct GuardedInventoryRepository<R, V> {
    inner: R,
    events: V,
}

impl<R, V> GuardedInventoryRepository<R, V> {
    pub fn new(inner: R, events: V) -> Self {
        Self { inner, events }
    }
}

impl<R, V> GuardedInventoryRepository<R, V>
where
    V: Repository<FlashSaleEvent>,
{
    async fn ensure_event_open(&self, event_id: &EntityId) -> DomainResult<()> {
        let event = self.events.get(event_id).await.map_err(|err| match err {
            DomainError::NotFound(_) => {
                DomainError::EventNotFound(format!("flash sale event {event_id} not found"))
            }
            other => other,
        })?;
        ensure_open_for_inventory(&event, Utc::now())
    }
}

#[async_trait]
impl<R, V> Repository<FlashSaleEventProduct> for GuardedInventoryRepository<R, V>
where
    R: Repository<FlashSaleEventProduct>,
    V: Repository<FlashSaleEvent>,
{
    #[instrument(skip(self, new), fields(event_id = %new.event_id), err)]
    async fn create(
        &self,
        new: flashsale_catalog::NewFlashSaleEventProduct,
    ) -> DomainResult<FlashSaleEventProduct> {
        self.ensure_event_open(&new.event_id).await?;
        self.inner.create(new).await
    }

    async fn get(&self, id: &EntityId) -> DomainResult<FlashSaleEventProduct> {
        self.inner.get(id).await
    }

    #[instrument(skip(self, record), fields(id = %record.id, event_id = %record.event_id), err)]
    async fn update(&self, record: FlashSaleEventProduct) -> DomainResult<FlashSaleEventProduct> {
        self.ensure_event_open(&record.event_id).await?;
        self.inner.update(record).await
    }

    async fn delete(&self, id: &EntityId) -> DomainResult<()> {
        self.inner.delete(id).await
    }

    async fn list(
        &self,
        filter: &flashsale_catalog::FlashSaleEventProductFilter,
        page: Page,
    ) -> DomainResult<Listing<FlashSaleEventProduct>> {
        self.inner.list(filter, page).await
    }
}
