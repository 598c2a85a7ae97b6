use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flashsale_core::{DomainError, DomainResult, Entity, EntityId, FilterSet, Record, RecordMeta, Value};

use crate::{require_non_negative, require_reference};

pub mod columns {
    pub const EVENT_ID: &str = "event_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const DISCOUNT_PERCENTAGE: &str = "discount_percentage";
    pub const SALE_PRICE: &str = "sale_price";
    pub const AVAILABLE_QUANTITY: &str = "available_quantity";
    pub const ORIGINAL_STOCK: &str = "original_stock";
}

/// Inventory allocated to a flash sale event for one product.
///
/// `available_quantity` and `original_stock` are bookkeeping only; nothing in the
/// catalog consumes stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashSaleEventProduct {
    pub id: EntityId,
    pub event_id: EntityId,
    pub product_id: EntityId,
    pub discount_percentage: Decimal,
    pub sale_price: Decimal,
    pub available_quantity: i32,
    pub original_stock: i32,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashSaleEventProduct {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub event_id: EntityId,
    pub product_id: EntityId,
    pub discount_percentage: Decimal,
    pub sale_price: Decimal,
    pub available_quantity: i32,
    pub original_stock: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashSaleEventProductFilter {
    pub event_id: Option<String>,
    pub product_id: Option<String>,
    pub min_discount_percentage: Option<Decimal>,
    pub max_discount_percentage: Option<Decimal>,
    pub min_sale_price: Option<Decimal>,
    pub max_sale_price: Option<Decimal>,
}

impl Entity for FlashSaleEventProduct {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for FlashSaleEventProduct {
    type New = NewFlashSaleEventProduct;
    type Filter = FlashSaleEventProductFilter;

    const KIND: &'static str = "flash sale event product";

    fn assemble(id: EntityId, new: NewFlashSaleEventProduct, meta: RecordMeta) -> Self {
        Self {
            id,
            event_id: new.event_id,
            product_id: new.product_id,
            discount_percentage: new.discount_percentage,
            sale_price: new.sale_price,
            available_quantity: new.available_quantity,
            original_stock: new.original_stock,
            meta,
        }
    }

    fn requested_id(new: &NewFlashSaleEventProduct) -> Option<&EntityId> {
        new.id.as_ref()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn validate(&self) -> DomainResult<()> {
        require_reference("event_id", &self.event_id)?;
        require_reference("product_id", &self.product_id)?;
        require_non_negative("discount_percentage", self.discount_percentage)?;
        require_non_negative("sale_price", self.sale_price)?;

        // 0 <= available_quantity <= original_stock
        if self.available_quantity < 0 {
            return Err(DomainError::validation("available_quantity cannot be negative"));
        }
        if self.available_quantity > self.original_stock {
            return Err(DomainError::validation(format!(
                "available_quantity ({}) cannot exceed original_stock ({})",
                self.available_quantity, self.original_stock
            )));
        }
        Ok(())
    }

    fn filter_set(filter: &FlashSaleEventProductFilter) -> FilterSet {
        FilterSet::new()
            .equals_text(columns::EVENT_ID, filter.event_id.as_deref())
            .equals_text(columns::PRODUCT_ID, filter.product_id.as_deref())
            .min_decimal(columns::DISCOUNT_PERCENTAGE, filter.min_discount_percentage)
            .max_decimal(columns::DISCOUNT_PERCENTAGE, filter.max_discount_percentage)
            .min_decimal(columns::SALE_PRICE, filter.min_sale_price)
            .max_decimal(columns::SALE_PRICE, filter.max_sale_price)
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            columns::EVENT_ID => Some(Value::from(self.event_id.as_str())),
            columns::PRODUCT_ID => Some(Value::from(self.product_id.as_str())),
            columns::DISCOUNT_PERCENTAGE => Some(Value::from(self.discount_percentage)),
            columns::SALE_PRICE => Some(Value::from(self.sale_price)),
            _ => None,
        }
    }
}
