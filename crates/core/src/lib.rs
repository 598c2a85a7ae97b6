//! `flashsale-core`: foundation building blocks for the catalog.
//!
//! This crate contains **pure** primitives (no infrastructure concerns): the error
//! taxonomy, identifiers, record bookkeeping and the backend-neutral list query model.

pub mod entity;
pub mod error;
pub mod id;
pub mod query;

pub use entity::{Entity, Record, RecordMeta, materialize};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::EntityId;
pub use query::{FilterSet, Listing, Page, Predicate, Value};
