use serde::{Deserialize, Serialize};

use flashsale_core::{DomainResult, Entity, EntityId, FilterSet, Record, RecordMeta, Value};

use crate::require_reference;

pub mod columns {
    pub const PRODUCT_ID: &str = "product_id";
    pub const DISCOUNT_ID: &str = "discount_id";
}

/// Attaches a discount to a product. References are by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiscount {
    pub id: EntityId,
    pub product_id: EntityId,
    pub discount_id: EntityId,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductDiscount {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub product_id: EntityId,
    pub discount_id: EntityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDiscountFilter {
    pub product_id: Option<String>,
    pub discount_id: Option<String>,
}

impl Entity for ProductDiscount {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for ProductDiscount {
    type New = NewProductDiscount;
    type Filter = ProductDiscountFilter;

    const KIND: &'static str = "product discount";

    fn assemble(id: EntityId, new: NewProductDiscount, meta: RecordMeta) -> Self {
        Self {
            id,
            product_id: new.product_id,
            discount_id: new.discount_id,
            meta,
        }
    }

    fn requested_id(new: &NewProductDiscount) -> Option<&EntityId> {
        new.id.as_ref()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn validate(&self) -> DomainResult<()> {
        require_reference("product_id", &self.product_id)?;
        require_reference("discount_id", &self.discount_id)
    }

    fn filter_set(filter: &ProductDiscountFilter) -> FilterSet {
        FilterSet::new()
            .equals_text(columns::PRODUCT_ID, filter.product_id.as_deref())
            .equals_text(columns::DISCOUNT_ID, filter.discount_id.as_deref())
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            columns::PRODUCT_ID => Some(Value::from(self.product_id.as_str())),
            columns::DISCOUNT_ID => Some(Value::from(self.discount_id.as_str())),
            _ => None,
        }
    }
}
