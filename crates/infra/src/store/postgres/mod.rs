//! Postgres-backed record repositories.
//!
//! One generic [`PostgresRepository`] serves every record kind; the per-kind pieces
//! (table, columns, row decoding, update guard) live in [`PgRecord`] impls.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | DomainError | Scenario |
//! |------------|----------------------|-------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate id on create |
//! | Database (other) | Any other | `StoreUnavailable` | Constraint or query failure |
//! | RowNotFound | N/A | `NotFound` | No live row matched |
//! | PoolClosed / Other | N/A | `StoreUnavailable` | Connectivity failures |
//!
//! Every message is prefixed with the operation that failed. Nothing is retried.

mod records;
pub mod sql;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use tracing::{instrument, Span};

use flashsale_core::{materialize, DomainError, DomainResult, EntityId, Listing, Page, Record};

use super::Repository;
use sql::Bind;

/// Table mapping for a record kind.
pub trait PgRecord: Record {
    const TABLE: &'static str;

    /// Settable columns, in the order [`PgRecord::binds`] yields them.
    const COLUMNS: &'static [&'static str];

    /// Extra SQL appended to the update's row match (e.g. `" AND status <> 'ENDED'"`).
    const UPDATE_GUARD: &'static str = "";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    fn binds(&self) -> Vec<Bind>;
}

/// Postgres repository for one record kind.
///
/// `Send + Sync`; all statements go through the shared SQLx pool and each one is
/// atomic on its own. There are no multi-statement transactions.
pub struct PostgresRepository<E> {
    pool: Arc<PgPool>,
    _record: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<E: PgRecord> PostgresRepository<E> {
    pub fn from_shared(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    fn decode(row: &PgRow) -> DomainResult<E> {
        E::from_row(row)
            .map_err(|e| DomainError::store(format!("failed to deserialize {} row: {e}", E::KIND)))
    }

    fn missing(id: &EntityId) -> DomainError {
        DomainError::not_found(format!("{} {} not found", E::KIND, id))
    }
}

#[async_trait]
impl<E: PgRecord> Repository<E> for PostgresRepository<E> {
    #[instrument(skip(self, new), fields(table = E::TABLE, operation, id), err)]
    async fn create(&self, new: E::New) -> DomainResult<E> {
        let span = Span::current();
        span.record("operation", "create");

        // Validates and assigns the id; timestamps come from the database.
        let record: E = materialize(new, chrono::Utc::now())?;
        span.record("id", record.id().as_str());

        let row = sql::insert_query(&record)
            .build()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("create_{}", E::TABLE), e))?;

        Self::decode(&row)
    }

    #[instrument(skip(self), fields(table = E::TABLE, id = %id), err)]
    async fn get(&self, id: &EntityId) -> DomainResult<E> {
        let row = sql::select_live_query::<E>(id)
            .build()
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("get_{}", E::TABLE), e))?;

        match row {
            Some(row) => Self::decode(&row),
            None => Err(Self::missing(id)),
        }
    }

    #[instrument(skip(self, record), fields(table = E::TABLE, id = %record.id()), err)]
    async fn update(&self, record: E) -> DomainResult<E> {
        record.validate()?;

        let row = sql::update_query(&record)
            .build()
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("update_{}", E::TABLE), e))?;

        match row {
            Some(row) => Self::decode(&row),
            None => Err(Self::missing(record.id())),
        }
    }

    #[instrument(skip(self), fields(table = E::TABLE, id = %id, affected), err)]
    async fn delete(&self, id: &EntityId) -> DomainResult<()> {
        let result = sql::soft_delete_query::<E>(id)
            .build()
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("delete_{}", E::TABLE), e))?;

        // zero rows (already deleted or never existed) is still a success
        Span::current().record("affected", result.rows_affected());
        Ok(())
    }

    #[instrument(skip(self, filter), fields(table = E::TABLE, page = page.page(), limit = page.limit(), total), err)]
    async fn list(&self, filter: &E::Filter, page: Page) -> DomainResult<Listing<E>> {
        let filters = E::filter_set(filter);

        let total: i64 = sql::count_query::<E>(&filters)
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("count_{}", E::TABLE), e))?;

        let rows = sql::page_query::<E>(&filters, page)
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("list_{}", E::TABLE), e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(Self::decode(row)?);
        }

        Span::current().record("total", total);
        Ok(Listing::new(items, u64::try_from(total).unwrap_or(0), page))
    }
}

/// Map SQLx errors to DomainError.
pub fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => DomainError::conflict(msg),
                _ => DomainError::store(msg),
            }
        }
        sqlx::Error::RowNotFound => DomainError::not_found(format!("no live row in {operation}")),
        sqlx::Error::PoolClosed => {
            DomainError::store(format!("connection pool closed in {operation}"))
        }
        _ => DomainError::store(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashsale_core::ErrorKind;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = map_sqlx_error("get_products", sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("get_products"));
    }

    #[test]
    fn connectivity_failures_are_store_unavailable() {
        let err = map_sqlx_error("list_products", sqlx::Error::PoolClosed);
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(
            err.to_string(),
            "store unavailable: connection pool closed in list_products"
        );
    }
}
