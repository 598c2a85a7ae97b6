//! Notification message templates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flashsale_catalog::{apply_discount, describe_discount, Discount, FlashSaleEvent, Product};
use flashsale_core::DomainResult;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Announcement broadcast when a flash sale event is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAnnouncement {
    pub event_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl EventAnnouncement {
    pub fn for_event(event: &FlashSaleEvent) -> Self {
        Self {
            event_name: event.name.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
        }
    }
}

impl core::fmt::Display for EventAnnouncement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "New Flash Sale Event: {}! Starts on {}, ends on {}. Check it out!",
            self.event_name,
            self.start_time.format(TIMESTAMP_FORMAT),
            self.end_time.format(TIMESTAMP_FORMAT),
        )
    }
}

/// Alert sent to every subscriber when a discount is attached to a product.
///
/// `sale_price` is the product's base price after the discount. Composing fails when
/// that price falls outside the `Decimal` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountAlert {
    pub product_name: String,
    pub description: String,
    pub original_price: Decimal,
    pub sale_price: Decimal,
}

impl DiscountAlert {
    pub fn compose(product: &Product, discount: &Discount) -> DomainResult<Self> {
        Ok(Self {
            product_name: product.name.clone(),
            description: describe_discount(discount),
            original_price: product.base_price,
            sale_price: apply_discount(product.base_price, discount)?,
        })
    }
}

impl core::fmt::Display for DiscountAlert {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Discount Alert! {} is now on sale with {} off! Original price: ${:.2}, Sale price: ${:.2}",
            self.product_name, self.description, self.original_price, self.sale_price,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flashsale_catalog::{DiscountType, EventStatus, EventType};
    use flashsale_core::{EntityId, RecordMeta};

    #[test]
    fn announcement_uses_plain_utc_timestamps() {
        let start = Utc.with_ymd_and_hms(2026, 11, 27, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 11, 27, 21, 30, 0).unwrap();
        let event = FlashSaleEvent {
            id: EntityId::new("evt-1"),
            name: "Black Friday".to_string(),
            description: String::new(),
            start_time: start,
            end_time: end,
            status: EventStatus::Upcoming,
            event_type: EventType::FlashSale,
            meta: RecordMeta::created(start),
        };

        assert_eq!(
            EventAnnouncement::for_event(&event).to_string(),
            "New Flash Sale Event: Black Friday! Starts on 2026-11-27 09:00:00, ends on 2026-11-27 21:30:00. Check it out!"
        );
    }

    #[test]
    fn discount_alert_prices_the_base_price() {
        let now = Utc::now();
        let product = Product {
            id: EntityId::new("p-1"),
            name: "Headphones".to_string(),
            description: String::new(),
            base_price: Decimal::ONE_HUNDRED,
            current_price: Decimal::new(95, 0),
            image_url: String::new(),
            stock_quantity: 3,
            meta: RecordMeta::created(now),
        };
        let discount = Discount {
            id: EntityId::new("d-1"),
            name: "Twenty off".to_string(),
            description: String::new(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::new(20, 0),
            start_date: now,
            end_date: now,
            is_active: true,
            meta: RecordMeta::created(now),
        };

        let alert = DiscountAlert::compose(&product, &discount).unwrap();
        assert_eq!(alert.sale_price, Decimal::new(80, 0));
        assert_eq!(alert.description, "20.00%");
        assert_eq!(
            alert.to_string(),
            "Discount Alert! Headphones is now on sale with 20.00% off! Original price: $100.00, Sale price: $80.00"
        );
    }
}
