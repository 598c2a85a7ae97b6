use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use flashsale_core::{materialize, DomainError, DomainResult, EntityId, Listing, Page, Record};

use super::Repository;

/// In-memory record store.
///
/// Intended for tests/dev. Rows are never physically removed; soft-deleted rows
/// stay in the vector so their ids keep conflicting on create.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<E: Record> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> DomainError {
        DomainError::store(format!("{} store lock poisoned", E::KIND))
    }

    fn missing(id: &EntityId) -> DomainError {
        DomainError::not_found(format!("{} {} not found", E::KIND, id))
    }
}

#[async_trait]
impl<E: Record> Repository<E> for InMemoryRepository<E> {
    async fn create(&self, new: E::New) -> DomainResult<E> {
        let record: E = materialize(new, Utc::now())?;

        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        if rows.iter().any(|r| r.id() == record.id()) {
            return Err(DomainError::conflict(format!(
                "{} {} already exists",
                E::KIND,
                record.id()
            )));
        }

        rows.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: &EntityId) -> DomainResult<E> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        rows.iter()
            .find(|r| r.id() == id && r.meta().is_live())
            .cloned()
            .ok_or_else(|| Self::missing(id))
    }

    async fn update(&self, record: E) -> DomainResult<E> {
        record.validate()?;
        let now = Utc::now();

        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        let stored = rows
            .iter_mut()
            .find(|r| r.id() == record.id() && r.meta().is_live() && r.accepts_update(now))
            .ok_or_else(|| Self::missing(record.id()))?;

        stored.replace_settable(record);
        stored.meta_mut().updated_at = now;
        Ok(stored.clone())
    }

    async fn delete(&self, id: &EntityId) -> DomainResult<()> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        if let Some(row) = rows.iter_mut().find(|r| r.id() == id && r.meta().is_live()) {
            row.meta_mut().deleted_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list(&self, filter: &E::Filter, page: Page) -> DomainResult<Listing<E>> {
        let filters = E::filter_set(filter);

        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        let mut matching: Vec<&E> = rows
            .iter()
            .filter(|r| r.meta().is_live() && filters.matches(*r))
            .collect();
        matching.sort_by(|a, b| {
            a.meta()
                .created_at
                .cmp(&b.meta().created_at)
                .then_with(|| a.id().cmp(b.id()))
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Listing::new(items, total, page))
    }
}
