//! Backend-neutral list query model.
//!
//! A [`FilterSet`] holds every predicate of one listing. Storage
//! backends render it (SQL) or evaluate it (in-memory), and both the total count and
//! the page are derived from the same set, so `total` always describes the set the
//! page was drawn from.
//!
//! Absent criteria are omitted entirely. For numeric criteria zero is treated as
//! unset, so "price >= 0" cannot be expressed; this is a known limitation.
//!
//! Text containment is case-insensitive in both backends. Postgres renders it as
//! `ILIKE` and folds case with the database collation; the in-memory backend compares
//! `str::to_lowercase` forms. They agree on ASCII and on simple one-to-one letters
//! such as `É`/`é`, but may differ for text whose case mapping changes length or is
//! locale-specific (`ß`/`SS`, dotted `İ`).

use core::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Record;

/// Default page number when the caller sends none (or a non-positive one).
pub const DEFAULT_PAGE: i64 = 1;
/// Default page size when the caller sends none (or a non-positive one).
pub const DEFAULT_LIMIT: i64 = 10;

/// A typed filter operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Decimal(Decimal),
    Time(DateTime<Utc>),
    Bool(bool),
}

impl Value {
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// One filter clause over a named column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match; the needle is matched literally.
    Contains { column: &'static str, needle: String },
    /// Exact match.
    Equals { column: &'static str, value: Value },
    /// Inclusive lower bound.
    AtLeast { column: &'static str, value: Value },
    /// Inclusive upper bound.
    AtMost { column: &'static str, value: Value },
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        match self {
            Predicate::Contains { column, .. }
            | Predicate::Equals { column, .. }
            | Predicate::AtLeast { column, .. }
            | Predicate::AtMost { column, .. } => column,
        }
    }

    /// Evaluate against a column value; a missing or mistyped value never matches.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return false;
        };

        match self {
            Predicate::Contains { needle, .. } => match actual {
                Value::Text(haystack) => haystack.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Predicate::Equals { value, .. } => actual.compare(value) == Some(Ordering::Equal),
            Predicate::AtLeast { value, .. } => {
                matches!(actual.compare(value), Some(Ordering::Greater | Ordering::Equal))
            }
            Predicate::AtMost { value, .. } => {
                matches!(actual.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

/// Accumulated predicates, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Substring match on a text column; skipped when the needle is blank.
    pub fn contains(mut self, column: &'static str, needle: Option<&str>) -> Self {
        if let Some(needle) = needle.filter(|n| !n.is_empty()) {
            self.predicates.push(Predicate::Contains {
                column,
                needle: needle.to_string(),
            });
        }
        self
    }

    /// Exact match on a text/enumerated column; skipped when blank.
    pub fn equals_text(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.predicates.push(Predicate::Equals {
                column,
                value: Value::Text(value.to_string()),
            });
        }
        self
    }

    /// Exact match on a boolean column, only when the flag is explicitly `true`.
    pub fn flag(mut self, column: &'static str, value: Option<bool>) -> Self {
        if value == Some(true) {
            self.predicates.push(Predicate::Equals {
                column,
                value: Value::Bool(true),
            });
        }
        self
    }

    /// Inclusive lower bound on a numeric column; zero counts as unset.
    pub fn min_decimal(mut self, column: &'static str, value: Option<Decimal>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_zero()) {
            self.predicates.push(Predicate::AtLeast {
                column,
                value: Value::Decimal(value),
            });
        }
        self
    }

    /// Inclusive upper bound on a numeric column; zero counts as unset.
    pub fn max_decimal(mut self, column: &'static str, value: Option<Decimal>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_zero()) {
            self.predicates.push(Predicate::AtMost {
                column,
                value: Value::Decimal(value),
            });
        }
        self
    }

    pub fn not_before(mut self, column: &'static str, value: Option<DateTime<Utc>>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::AtLeast {
                column,
                value: Value::Time(value),
            });
        }
        self
    }

    pub fn not_after(mut self, column: &'static str, value: Option<DateTime<Utc>>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::AtMost {
                column,
                value: Value::Time(value),
            });
        }
        self
    }

    /// Evaluate every predicate against a record (in-memory backends).
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.predicates
            .iter()
            .all(|p| p.matches(record.field(p.column()).as_ref()))
    }
}

/// Normalised pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    page: i64,
    limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Any value `<= 0` is replaced by its default.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page <= 0 { DEFAULT_PAGE } else { page },
            limit: if limit <= 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn from_params(page: Option<i64>, limit: Option<i64>) -> Self {
        Self::new(page.unwrap_or(0), limit.unwrap_or(0))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Number of live rows matching the filter, across all pages.
    pub total: u64,
    pub page: Page,
    pub has_more: bool,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>, total: u64, page: Page) -> Self {
        let seen = u64::try_from(page.offset())
            .unwrap_or(u64::MAX)
            .saturating_add(items.len() as u64);
        Self {
            items,
            total,
            page,
            has_more: total > seen,
        }
    }
}
