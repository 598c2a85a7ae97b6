use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flashsale_core::{DomainError, DomainResult, Entity, EntityId, FilterSet, Record, RecordMeta, Value};

use crate::{require_non_negative, require_text};

/// Column names shared by filters and storage backends.
pub mod columns {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const DISCOUNT_TYPE: &str = "discount_type";
    pub const DISCOUNT_VALUE: &str = "discount_value";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const IS_ACTIVE: &str = "is_active";
}

/// How a discount value reduces a price.
///
/// Tags outside the two supported ones can still be loaded from storage
/// (`Unrecognized`), but they are rejected on create/update and priced as
/// "no reduction".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
    Unrecognized(String),
}

impl DiscountType {
    pub fn as_str(&self) -> &str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::FixedAmount => "FIXED_AMOUNT",
            DiscountType::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for DiscountType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PERCENTAGE" => DiscountType::Percentage,
            "FIXED_AMOUNT" => DiscountType::FixedAmount,
            _ => DiscountType::Unrecognized(value),
        }
    }
}

impl From<&str> for DiscountType {
    fn from(value: &str) -> Self {
        DiscountType::from(value.to_string())
    }
}

impl From<DiscountType> for String {
    fn from(value: DiscountType) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price reduction that can be attached to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Create input for [`Discount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDiscount {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
}

/// List criteria for discounts.
///
/// `start_date` keeps discounts starting at or after the bound, `end_date` keeps
/// discounts ending at or before it. `is_active` only filters when `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<String>,
    pub min_discount_value: Option<Decimal>,
    pub max_discount_value: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl Entity for Discount {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Discount {
    type New = NewDiscount;
    type Filter = DiscountFilter;

    const KIND: &'static str = "discount";

    fn assemble(id: EntityId, new: NewDiscount, meta: RecordMeta) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            discount_type: new.discount_type,
            discount_value: new.discount_value,
            start_date: new.start_date,
            end_date: new.end_date,
            is_active: new.is_active,
            meta,
        }
    }

    fn requested_id(new: &NewDiscount) -> Option<&EntityId> {
        new.id.as_ref()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_non_negative("discount_value", self.discount_value)?;
        if let DiscountType::Unrecognized(tag) = &self.discount_type {
            return Err(DomainError::validation(format!(
                "discount_type must be PERCENTAGE or FIXED_AMOUNT, got '{tag}'"
            )));
        }
        Ok(())
    }

    fn filter_set(filter: &DiscountFilter) -> FilterSet {
        FilterSet::new()
            .contains(columns::NAME, filter.name.as_deref())
            .contains(columns::DESCRIPTION, filter.description.as_deref())
            .equals_text(columns::DISCOUNT_TYPE, filter.discount_type.as_deref())
            .min_decimal(columns::DISCOUNT_VALUE, filter.min_discount_value)
            .max_decimal(columns::DISCOUNT_VALUE, filter.max_discount_value)
            .not_before(columns::START_DATE, filter.start_date)
            .not_after(columns::END_DATE, filter.end_date)
            .flag(columns::IS_ACTIVE, filter.is_active)
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            columns::NAME => Some(Value::from(self.name.as_str())),
            columns::DESCRIPTION => Some(Value::from(self.description.as_str())),
            columns::DISCOUNT_TYPE => Some(Value::from(self.discount_type.as_str())),
            columns::DISCOUNT_VALUE => Some(Value::from(self.discount_value)),
            columns::START_DATE => Some(Value::from(self.start_date)),
            columns::END_DATE => Some(Value::from(self.end_date)),
            columns::IS_ACTIVE => Some(Value::from(self.is_active)),
            _ => None,
        }
    }
}
