//! Table mappings for the catalog records.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;

use flashsale_catalog::{
    discount, flash_sale_event, flash_sale_event_product, product, product_discount, Discount,
    DiscountType, EventStatus, EventType, FlashSaleEvent, FlashSaleEventProduct, Product,
    ProductDiscount,
};
use flashsale_core::{EntityId, RecordMeta};

use super::sql::Bind;
use super::PgRecord;

fn id_column(row: &PgRow, column: &str) -> Result<EntityId, sqlx::Error> {
    Ok(EntityId::new(row.try_get::<String, _>(column)?))
}

fn meta_columns(row: &PgRow) -> Result<RecordMeta, sqlx::Error> {
    Ok(RecordMeta {
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")?,
    })
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: core::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl PgRecord for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        product::columns::NAME,
        product::columns::DESCRIPTION,
        product::columns::BASE_PRICE,
        product::columns::CURRENT_PRICE,
        product::columns::IMAGE_URL,
        product::columns::STOCK_QUANTITY,
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Product {
            id: id_column(row, "id")?,
            name: row.try_get(product::columns::NAME)?,
            description: row.try_get(product::columns::DESCRIPTION)?,
            base_price: row.try_get(product::columns::BASE_PRICE)?,
            current_price: row.try_get(product::columns::CURRENT_PRICE)?,
            image_url: row.try_get(product::columns::IMAGE_URL)?,
            stock_quantity: row.try_get(product::columns::STOCK_QUANTITY)?,
            meta: meta_columns(row)?,
        })
    }

    fn binds(&self) -> Vec<Bind> {
        vec![
            Bind::Text(self.name.clone()),
            Bind::Text(self.description.clone()),
            Bind::Decimal(self.base_price),
            Bind::Decimal(self.current_price),
            Bind::Text(self.image_url.clone()),
            Bind::Int(self.stock_quantity),
        ]
    }
}

impl PgRecord for Discount {
    const TABLE: &'static str = "discounts";
    const COLUMNS: &'static [&'static str] = &[
        discount::columns::NAME,
        discount::columns::DESCRIPTION,
        discount::columns::DISCOUNT_TYPE,
        discount::columns::DISCOUNT_VALUE,
        discount::columns::START_DATE,
        discount::columns::END_DATE,
        discount::columns::IS_ACTIVE,
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Discount {
            id: id_column(row, "id")?,
            name: row.try_get(discount::columns::NAME)?,
            description: row.try_get(discount::columns::DESCRIPTION)?,
            // unknown tags still load; they are rejected on write
            discount_type: DiscountType::from(
                row.try_get::<String, _>(discount::columns::DISCOUNT_TYPE)?,
            ),
            discount_value: row.try_get(discount::columns::DISCOUNT_VALUE)?,
            start_date: row.try_get(discount::columns::START_DATE)?,
            end_date: row.try_get(discount::columns::END_DATE)?,
            is_active: row.try_get(discount::columns::IS_ACTIVE)?,
            meta: meta_columns(row)?,
        })
    }

    fn binds(&self) -> Vec<Bind> {
        vec![
            Bind::Text(self.name.clone()),
            Bind::Text(self.description.clone()),
            Bind::Text(self.discount_type.as_str().to_string()),
            Bind::Decimal(self.discount_value),
            Bind::Time(self.start_date),
            Bind::Time(self.end_date),
            Bind::Bool(self.is_active),
        ]
    }
}

impl PgRecord for FlashSaleEvent {
    const TABLE: &'static str = "flash_sale_events";
    const COLUMNS: &'static [&'static str] = &[
        flash_sale_event::columns::NAME,
        flash_sale_event::columns::DESCRIPTION,
        flash_sale_event::columns::START_TIME,
        flash_sale_event::columns::END_TIME,
        flash_sale_event::columns::STATUS,
        flash_sale_event::columns::EVENT_TYPE,
    ];
    const UPDATE_GUARD: &'static str =
        " AND start_time > NOW() AND end_time >= NOW() AND status <> 'ENDED'";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(FlashSaleEvent {
            id: id_column(row, "id")?,
            name: row.try_get(flash_sale_event::columns::NAME)?,
            description: row.try_get(flash_sale_event::columns::DESCRIPTION)?,
            start_time: row.try_get(flash_sale_event::columns::START_TIME)?,
            end_time: row.try_get(flash_sale_event::columns::END_TIME)?,
            status: parse_column::<EventStatus>(row, flash_sale_event::columns::STATUS)?,
            event_type: parse_column::<EventType>(row, flash_sale_event::columns::EVENT_TYPE)?,
            meta: meta_columns(row)?,
        })
    }

    fn binds(&self) -> Vec<Bind> {
        vec![
            Bind::Text(self.name.clone()),
            Bind::Text(self.description.clone()),
            Bind::Time(self.start_time),
            Bind::Time(self.end_time),
            Bind::Text(self.status.as_str().to_string()),
            Bind::Text(self.event_type.as_str().to_string()),
        ]
    }
}

impl PgRecord for ProductDiscount {
    const TABLE: &'static str = "product_discounts";
    const COLUMNS: &'static [&'static str] = &[
        product_discount::columns::PRODUCT_ID,
        product_discount::columns::DISCOUNT_ID,
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductDiscount {
            id: id_column(row, "id")?,
            product_id: id_column(row, product_discount::columns::PRODUCT_ID)?,
            discount_id: id_column(row, product_discount::columns::DISCOUNT_ID)?,
            meta: meta_columns(row)?,
        })
    }

    fn binds(&self) -> Vec<Bind> {
        vec![
            Bind::Text(self.product_id.as_str().to_string()),
            Bind::Text(self.discount_id.as_str().to_string()),
        ]
    }
}

impl PgRecord for FlashSaleEventProduct {
    const TABLE: &'static str = "flash_sale_event_products";
    const COLUMNS: &'static [&'static str] = &[
        flash_sale_event_product::columns::EVENT_ID,
        flash_sale_event_product::columns::PRODUCT_ID,
        flash_sale_event_product::columns::DISCOUNT_PERCENTAGE,
        flash_sale_event_product::columns::SALE_PRICE,
        flash_sale_event_product::columns::AVAILABLE_QUANTITY,
        flash_sale_event_product::columns::ORIGINAL_STOCK,
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        use flash_sale_event_product::columns;

        Ok(FlashSaleEventProduct {
            id: id_column(row, "id")?,
            event_id: id_column(row, columns::EVENT_ID)?,
            product_id: id_column(row, columns::PRODUCT_ID)?,
            discount_percentage: row.try_get(columns::DISCOUNT_PERCENTAGE)?,
            sale_price: row.try_get(columns::SALE_PRICE)?,
            available_quantity: row.try_get(columns::AVAILABLE_QUANTITY)?,
            original_stock: row.try_get(columns::ORIGINAL_STOCK)?,
            meta: meta_columns(row)?,
        })
    }

    fn binds(&self) -> Vec<Bind> {
        vec![
            Bind::Text(self.event_id.as_str().to_string()),
            Bind::Text(self.product_id.as_str().to_string()),
            Bind::Decimal(self.discount_percentage),
            Bind::Decimal(self.sale_price),
            Bind::Int(self.available_quantity),
            Bind::Int(self.original_stock),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_columns_match_binds<E: PgRecord>(record: &E) {
        assert_eq!(E::COLUMNS.len(), record.binds().len(), "{}", E::TABLE);
    }

    #[test]
    fn every_mapping_binds_each_column() {
        let now = Utc::now();
        let meta = RecordMeta::created(now);

        assert_columns_match_binds(&ProductDiscount {
            id: EntityId::new("pd-1"),
            product_id: EntityId::new("p-1"),
            discount_id: EntityId::new("d-1"),
            meta: meta.clone(),
        });
        assert_columns_match_binds(&FlashSaleEventProduct {
            id: EntityId::new("fp-1"),
            event_id: EntityId::new("e-1"),
            product_id: EntityId::new("p-1"),
            discount_percentage: rust_decimal::Decimal::ONE,
            sale_price: rust_decimal::Decimal::ONE,
            available_quantity: 1,
            original_stock: 1,
            meta: meta.clone(),
        });
        assert_columns_match_binds(&Discount {
            id: EntityId::new("d-1"),
            name: "d".to_string(),
            description: String::new(),
            discount_type: DiscountType::Percentage,
            discount_value: rust_decimal::Decimal::ONE,
            start_date: now,
            end_date: now,
            is_active: false,
            meta,
        });
    }

    #[test]
    fn decimal_columns_keep_full_precision() {
        let schema = include_str!("../../../schema.sql");
        let decimal_columns = [
            "base_price",
            "current_price",
            "discount_value",
            "discount_percentage",
            "sale_price",
        ];

        for column in decimal_columns {
            let definition = schema
                .lines()
                .map(str::trim)
                .find(|line| line.split_whitespace().next() == Some(column))
                .unwrap_or_else(|| panic!("{column} missing from schema"));
            assert!(
                definition.contains("NUMERIC NOT NULL"),
                "{column} must be unconstrained NUMERIC: {definition}"
            );
        }
    }
}
