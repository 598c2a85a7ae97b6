//! Entity trait and the bookkeeping every stored record carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::id::EntityId;
use crate::query::{FilterSet, Value};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Store-assigned timestamps plus the soft-delete marker.
///
/// `deleted_at == None` is a live row. Any `Some` is deleted: invisible to reads,
/// listings and counts, and no longer mutable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordMeta {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    /// Metadata for a record created at `now`.
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A catalog record the entity store can persist, filter and soft-delete.
///
/// Implementations supply the shape-specific pieces (validation, column lookup for
/// filtering, list filter translation); stores provide everything else generically.
pub trait Record: Entity<Id = EntityId> + Clone + Send + Sync + 'static {
    /// Create input: every settable column plus an optional caller-chosen id.
    type New: Send + 'static;

    /// Sparse list criteria.
    type Filter: Default + Send + Sync + 'static;

    /// Human-readable kind, used in messages and spans (e.g. `"product"`).
    const KIND: &'static str;

    /// Build a record from its settable columns.
    fn assemble(id: EntityId, new: Self::New, meta: RecordMeta) -> Self;

    /// The id the caller asked for, if any.
    fn requested_id(new: &Self::New) -> Option<&EntityId>;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Structural validation of caller-settable columns.
    fn validate(&self) -> DomainResult<()>;

    /// Translate list criteria into predicates.
    fn filter_set(filter: &Self::Filter) -> FilterSet;

    /// Value of a filterable column, by column name.
    fn field(&self, column: &str) -> Option<Value>;

    /// Extra row-match condition for updates, evaluated against the stored row.
    ///
    /// A row that does not accept the update behaves exactly like a missing row.
    fn accepts_update(&self, _now: DateTime<Utc>) -> bool {
        true
    }

    /// Full replace of the settable columns; id and bookkeeping are kept.
    fn replace_settable(&mut self, mut next: Self) {
        *next.meta_mut() = self.meta().clone();
        *self = next;
    }
}

/// Turn a create input into a validated record stamped at `now`.
///
/// A blank or missing id is replaced with a generated one.
pub fn materialize<R: Record>(new: R::New, now: DateTime<Utc>) -> DomainResult<R> {
    let id = R::requested_id(&new)
        .filter(|id| !id.is_empty())
        .cloned()
        .unwrap_or_else(EntityId::generate);

    let record = R::assemble(id, new, RecordMeta::created(now));
    record.validate()?;
    Ok(record)
}
