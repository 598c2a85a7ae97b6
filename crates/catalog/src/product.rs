use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flashsale_core::{DomainError, DomainResult, Entity, EntityId, FilterSet, Record, RecordMeta, Value};

use crate::{require_non_negative, require_text};

/// Column names shared by filters and storage backends.
pub mod columns {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const BASE_PRICE: &str = "base_price";
    pub const CURRENT_PRICE: &str = "current_price";
    pub const IMAGE_URL: &str = "image_url";
    pub const STOCK_QUANTITY: &str = "stock_quantity";
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
    pub current_price: Decimal,
    pub image_url: String,
    pub stock_quantity: i32,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Create input for [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Decimal,
    pub current_price: Decimal,
    #[serde(default)]
    pub image_url: String,
    pub stock_quantity: i32,
}

/// List criteria for products. Price bounds apply to the current price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl Entity for Product {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Product {
    type New = NewProduct;
    type Filter = ProductFilter;

    const KIND: &'static str = "product";

    fn assemble(id: EntityId, new: NewProduct, meta: RecordMeta) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            base_price: new.base_price,
            current_price: new.current_price,
            image_url: new.image_url,
            stock_quantity: new.stock_quantity,
            meta,
        }
    }

    fn requested_id(new: &NewProduct) -> Option<&EntityId> {
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
        require_non_negative("base_price", self.base_price)?;
        require_non_negative("current_price", self.current_price)?;
        if self.stock_quantity < 0 {
            return Err(DomainError::validation("stock_quantity cannot be negative"));
        }
        Ok(())
    }

    fn filter_set(filter: &ProductFilter) -> FilterSet {
        FilterSet::new()
            .contains(columns::NAME, filter.name.as_deref())
            .contains(columns::DESCRIPTION, filter.description.as_deref())
            .min_decimal(columns::CURRENT_PRICE, filter.min_price)
            .max_decimal(columns::CURRENT_PRICE, filter.max_price)
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            columns::NAME => Some(Value::from(self.name.as_str())),
            columns::DESCRIPTION => Some(Value::from(self.description.as_str())),
            columns::BASE_PRICE => Some(Value::from(self.base_price)),
            columns::CURRENT_PRICE => Some(Value::from(self.current_price)),
            columns::IMAGE_URL => Some(Value::from(self.image_url.as_str())),
            _ => None,
        }
    }
}
