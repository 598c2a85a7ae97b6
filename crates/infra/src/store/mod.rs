//! Entity store boundary.
//!
//! One capability set (`Repository`) with an implementation per backend, composed
//! behind the [`Storage`] aggregate that exposes one accessor per entity kind.
//!
//! Every backend honours the same contract:
//! - reads, listings and counts only see live rows (`deleted_at` unset)
//! - `update` is a full replace of the settable columns and reports `NotFound` when
//!   no live row matches (including rows that refuse the update)
//! - `delete` stamps `deleted_at` once; deleting again still succeeds
//! - listings are ordered by `created_at` then `id`

pub mod guarded;
pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use flashsale_catalog::{Discount, FlashSaleEvent, FlashSaleEventProduct, Product, ProductDiscount};
use flashsale_core::{DomainResult, EntityId, Listing, Page, Record};

pub use guarded::GuardedInventoryRepository;
pub use in_memory::InMemoryRepository;
pub use postgres::{PgRecord, PostgresRepository};

/// CRUD + filtered listing for one record kind.
#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    /// Persist a new record. Assigns the id (if blank) and the timestamps.
    async fn create(&self, new: E::New) -> DomainResult<E>;

    /// Fetch a live record.
    async fn get(&self, id: &EntityId) -> DomainResult<E>;

    /// Replace every settable column of the live record with `record.id`.
    async fn update(&self, record: E) -> DomainResult<E>;

    /// Soft-delete. Succeeds even when nothing was live.
    async fn delete(&self, id: &EntityId) -> DomainResult<()>;

    /// One page of live records matching `filter`, plus the matching total.
    async fn list(&self, filter: &E::Filter, page: Page) -> DomainResult<Listing<E>>;
}

#[async_trait]
impl<E, R> Repository<E> for Arc<R>
where
    E: Record,
    R: Repository<E> + ?Sized,
{
    async fn create(&self, new: E::New) -> DomainResult<E> {
        (**self).create(new).await
    }

    async fn get(&self, id: &EntityId) -> DomainResult<E> {
        (**self).get(id).await
    }

    async fn update(&self, record: E) -> DomainResult<E> {
        (**self).update(record).await
    }

    async fn delete(&self, id: &EntityId) -> DomainResult<()> {
        (**self).delete(id).await
    }

    async fn list(&self, filter: &E::Filter, page: Page) -> DomainResult<Listing<E>> {
        (**self).list(filter, page).await
    }
}

/// Shared handle to a repository of `E`.
pub type RepositoryRef<E> = Arc<dyn Repository<E>>;

/// All catalog repositories behind one handle.
///
/// Flash sale inventory is always wired through [`GuardedInventoryRepository`], so
/// no caller can write inventory against a closed event.
#[derive(Clone)]
pub struct Storage {
    products: RepositoryRef<Product>,
    discounts: RepositoryRef<Discount>,
    flash_sale_events: RepositoryRef<FlashSaleEvent>,
    product_discounts: RepositoryRef<ProductDiscount>,
    flash_sale_event_products: RepositoryRef<FlashSaleEventProduct>,
}

impl Storage {
    /// Compose a storage from raw repositories; inventory gets the lifecycle guard.
    pub fn new(
        products: RepositoryRef<Product>,
        discounts: RepositoryRef<Discount>,
        flash_sale_events: RepositoryRef<FlashSaleEvent>,
        product_discounts: RepositoryRef<ProductDiscount>,
        flash_sale_event_products: RepositoryRef<FlashSaleEventProduct>,
    ) -> Self {
        let guarded: RepositoryRef<FlashSaleEventProduct> = Arc::new(GuardedInventoryRepository::new(
            flash_sale_event_products,
            flash_sale_events.clone(),
        ));

        Self {
            products,
            discounts,
            flash_sale_events,
            product_discounts,
            flash_sale_event_products: guarded,
        }
    }

    /// Process-local storage for tests and development.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::<Product>::new()),
            Arc::new(InMemoryRepository::<Discount>::new()),
            Arc::new(InMemoryRepository::<FlashSaleEvent>::new()),
            Arc::new(InMemoryRepository::<ProductDiscount>::new()),
            Arc::new(InMemoryRepository::<FlashSaleEventProduct>::new()),
        )
    }

    /// PostgreSQL storage sharing one connection pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let pool = Arc::new(pool);
        Self::new(
            Arc::new(PostgresRepository::<Product>::from_shared(pool.clone())),
            Arc::new(PostgresRepository::<Discount>::from_shared(pool.clone())),
            Arc::new(PostgresRepository::<FlashSaleEvent>::from_shared(pool.clone())),
            Arc::new(PostgresRepository::<ProductDiscount>::from_shared(pool.clone())),
            Arc::new(PostgresRepository::<FlashSaleEventProduct>::from_shared(pool)),
        )
    }

    pub fn products(&self) -> &dyn Repository<Product> {
        self.products.as_ref()
    }

    pub fn discounts(&self) -> &dyn Repository<Discount> {
        self.discounts.as_ref()
    }

    pub fn flash_sale_events(&self) -> &dyn Repository<FlashSaleEvent> {
        self.flash_sale_events.as_ref()
    }

    pub fn product_discounts(&self) -> &dyn Repository<ProductDiscount> {
        self.product_discounts.as_ref()
    }

    pub fn flash_sale_event_products(&self) -> &dyn Repository<FlashSaleEventProduct> {
        self.flash_sale_event_products.as_ref()
    }
}

impl core::fmt::Debug for Storage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
