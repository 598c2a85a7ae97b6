//! End-to-end tests for the catalog service over the in-memory backend.
//!
//! Verifies:
//! - records round-trip and soft-delete the same way for every kind
//! - listings stay consistent with their totals
//! - the lifecycle gate on flash sale inventory
//! - notification side effects and their failure policy

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use flashsale_catalog::{
    DiscountFilter, DiscountType, EventStatus, EventType, FlashSaleEventFilter,
    FlashSaleEventProductFilter, NewDiscount, NewFlashSaleEvent, NewFlashSaleEventProduct,
    NewProduct, NewProductDiscount, ProductDiscountFilter, ProductFilter,
};
use flashsale_core::{EntityId, ErrorKind, Page};

use crate::notify::{
    InMemorySubscriberDirectory, NotificationConfig, Notifier, RecordingDelivery,
};
use crate::service::CatalogService;
use crate::store::Storage;

struct Harness {
    service: CatalogService,
    delivery: Arc<RecordingDelivery>,
}

fn harness_with(subscribers: &[&str], failing: &[&str]) -> Harness {
    let delivery = Arc::new(RecordingDelivery::failing_for(failing.iter().copied()));
    let notifier = Notifier::new(
        Arc::new(InMemorySubscriberDirectory::new(subscribers.iter().copied())),
        delivery.clone(),
        NotificationConfig::default(),
    );
    Harness {
        service: CatalogService::new(Storage::in_memory(), Arc::new(notifier)),
        delivery,
    }
}

fn harness() -> Harness {
    harness_with(&["ana@example.com", "bo@example.com"], &[])
}

fn product(name: &str, base: i64) -> NewProduct {
    NewProduct {
        id: None,
        name: name.to_string(),
        description: format!("{name} description"),
        base_price: Decimal::new(base, 0),
        current_price: Decimal::new(base, 0),
        image_url: format!("https://cdn.example.com/{name}.png"),
        stock_quantity: 12,
    }
}

fn discount(kind: DiscountType, value: i64) -> NewDiscount {
    let now = Utc::now();
    NewDiscount {
        id: None,
        name: "Weekend deal".to_string(),
        description: String::new(),
        discount_type: kind,
        discount_value: Decimal::new(value, 0),
        start_date: now,
        end_date: now + Duration::days(2),
        is_active: true,
    }
}

fn event(start_in: Duration, end_in: Duration, status: EventStatus) -> NewFlashSaleEvent {
    let now = Utc::now();
    NewFlashSaleEvent {
        id: None,
        name: "Cyber Monday".to_string(),
        description: "Online only".to_string(),
        start_time: now + start_in,
        end_time: now + end_in,
        status,
        event_type: EventType::FlashSale,
    }
}

fn allocation(event_id: &EntityId, product_id: &EntityId) -> NewFlashSaleEventProduct {
    NewFlashSaleEventProduct {
        id: None,
        event_id: event_id.clone(),
        product_id: product_id.clone(),
        discount_percentage: Decimal::new(30, 0),
        sale_price: Decimal::new(70, 0),
        available_quantity: 5,
        original_stock: 5,
    }
}

#[tokio::test]
async fn created_records_read_back_with_their_settable_fields() {
    let h = harness();

    let p = h.service.create_product(product("Blender", 100)).await.unwrap();
    let fetched = h.service.get_product(&p.id).await.unwrap();
    assert_eq!(fetched.name, "Blender");
    assert_eq!(fetched.base_price, Decimal::new(100, 0));
    assert_eq!(fetched.image_url, "https://cdn.example.com/Blender.png");
    assert!(fetched.meta.deleted_at.is_none());

    let d = h
        .service
        .create_discount(discount(DiscountType::FixedAmount, 15))
        .await
        .unwrap();
    assert_eq!(h.service.get_discount(&d.id).await.unwrap(), d);
}

#[tokio::test]
async fn deleted_records_vanish_from_get_and_every_listing() {
    let h = harness();
    let p = h.service.create_product(product("Toaster", 40)).await.unwrap();
    h.service.create_product(product("Kettle", 30)).await.unwrap();

    let ack = h.service.delete_product(&p.id).await.unwrap();
    assert_eq!(ack, "Product deleted successfully");

    let err = h.service.get_product(&p.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.operation, "get product");

    for filter in [
        ProductFilter::default(),
        ProductFilter {
            name: Some("toast".to_string()),
            ..Default::default()
        },
    ] {
        let listing = h.service.list_products(&filter, Page::default()).await.unwrap();
        assert!(listing.items.iter().all(|item| item.id != p.id));
    }

    // deleting again is a silent no-op
    assert!(h.service.delete_product(&p.id).await.is_ok());
}

#[tokio::test]
async fn listing_respects_limit_and_reports_filtered_total() {
    let h = harness();
    for i in 0..12 {
        h.service
            .create_product(product(&format!("Widget {i}"), 10 + i))
            .await
            .unwrap();
    }
    h.service.create_product(product("Gadget", 500)).await.unwrap();

    let filter = ProductFilter {
        name: Some("widget".to_string()),
        max_price: Some(Decimal::new(15, 0)),
        ..Default::default()
    };
    let listing = h.service.list_products(&filter, Page::new(1, 4)).await.unwrap();

    assert_eq!(listing.total, 6);
    assert_eq!(listing.items.len(), 4);
    assert!(listing.items.len() as u64 <= listing.total);
    assert!(listing.has_more);
}

#[tokio::test]
async fn zero_paging_behaves_like_the_defaults() {
    let h = harness();
    for i in 0..15 {
        h.service
            .create_discount(discount(DiscountType::Percentage, i))
            .await
            .unwrap();
    }

    let zero = h
        .service
        .list_discounts(&DiscountFilter::default(), Page::new(0, 0))
        .await
        .unwrap();
    let defaults = h
        .service
        .list_discounts(&DiscountFilter::default(), Page::new(1, 10))
        .await
        .unwrap();

    assert_eq!(zero.items.len(), 10);
    assert_eq!(zero, defaults);
}

#[tokio::test]
async fn product_discount_alert_prices_the_product() {
    let h = harness();
    let p = h.service.create_product(product("Espresso machine", 100)).await.unwrap();
    let d = h
        .service
        .create_discount(discount(DiscountType::Percentage, 20))
        .await
        .unwrap();

    let link = h
        .service
        .create_product_discount(NewProductDiscount {
            id: None,
            product_id: p.id.clone(),
            discount_id: d.id.clone(),
        })
        .await
        .unwrap();

    let alert = h.service.discount_alert(&link).await.unwrap();
    assert_eq!(alert.sale_price, Decimal::new(80, 0));
    assert_eq!(alert.description, "20.00%");

    let sent = h.delivery.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "ana@example.com");
    assert_eq!(sent[1].0, "bo@example.com");
    assert_eq!(
        sent[0].1,
        "Discount Alert! Espresso machine is now on sale with 20.00% off! Original price: $100.00, Sale price: $80.00"
    );
}

#[tokio::test]
async fn delivery_failure_does_not_fail_the_product_discount() {
    let h = harness_with(&["ana@example.com", "bo@example.com"], &["ana@example.com"]);
    let p = h.service.create_product(product("Grinder", 60)).await.unwrap();
    let d = h
        .service
        .create_discount(discount(DiscountType::FixedAmount, 10))
        .await
        .unwrap();

    let link = h
        .service
        .create_product_discount(NewProductDiscount {
            id: None,
            product_id: p.id,
            discount_id: d.id,
        })
        .await
        .unwrap();

    // first recipient failed, so nobody after it was reached
    assert!(h.delivery.sent().is_empty());
    assert!(h.service.get_product_discount(&link.id).await.is_ok());
}

#[tokio::test]
async fn product_discount_with_missing_product_fails_after_persisting() {
    let h = harness();
    let d = h
        .service
        .create_discount(discount(DiscountType::Percentage, 5))
        .await
        .unwrap();

    let err = h
        .service
        .create_product_discount(NewProductDiscount {
            id: Some(EntityId::new("pd-orphan")),
            product_id: EntityId::new("no-such-product"),
            discount_id: d.id,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.operation, "get product for notification");
    // no referential check on the link itself
    assert!(h.service.get_product_discount(&EntityId::new("pd-orphan")).await.is_ok());
    assert!(h.delivery.sent().is_empty());
}

#[tokio::test]
async fn unrepresentable_sale_price_skips_the_alert_without_panicking() {
    let h = harness();
    let huge = Decimal::from_i128_with_scale(1_000_000_000_000_000_000, 0);

    let mut input = product("Yacht", 0);
    input.base_price = huge;
    input.current_price = huge;
    let p = h.service.create_product(input).await.unwrap();

    let mut steep = discount(DiscountType::Percentage, 0);
    steep.discount_value = huge;
    let d = h.service.create_discount(steep).await.unwrap();

    let link = h
        .service
        .create_product_discount(NewProductDiscount {
            id: None,
            product_id: p.id,
            discount_id: d.id,
        })
        .await
        .unwrap();

    assert!(h.service.get_product_discount(&link.id).await.is_ok());
    assert!(h.delivery.sent().is_empty());

    let err = h.service.discount_alert(&link).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.operation, "price discount alert");
}

#[tokio::test]
async fn event_creation_broadcasts_an_announcement() {
    let h = harness();
    let e = h
        .service
        .create_flash_sale_event(event(Duration::hours(1), Duration::hours(5), EventStatus::Upcoming))
        .await
        .unwrap();

    let sent = h.delivery.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "broadcast");
    assert!(sent[0].1.starts_with("New Flash Sale Event: Cyber Monday! Starts on "));
    assert!(sent[0].1.contains(&e.start_time.format("%Y-%m-%d %H:%M:%S").to_string()));
}

#[tokio::test]
async fn broadcast_failure_does_not_fail_event_creation() {
    let h = harness_with(&[], &["broadcast"]);
    let e = h
        .service
        .create_flash_sale_event(event(Duration::hours(1), Duration::hours(5), EventStatus::Upcoming))
        .await
        .unwrap();
    assert!(h.service.get_flash_sale_event(&e.id).await.is_ok());
}

#[tokio::test]
async fn inventory_against_expired_event_is_rejected_even_when_upcoming() {
    let h = harness();
    let p = h.service.create_product(product("Drone", 300)).await.unwrap();
    let e = h
        .service
        .create_flash_sale_event(event(Duration::hours(-3), Duration::hours(-1), EventStatus::Upcoming))
        .await
        .unwrap();

    let err = h
        .service
        .create_flash_sale_event_product(allocation(&e.id, &p.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EventExpired);

    let listing = h
        .service
        .list_flash_sale_event_products(&FlashSaleEventProductFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(listing.total, 0);
}

#[tokio::test]
async fn inventory_against_ended_event_is_rejected() {
    let h = harness();
    let p = h.service.create_product(product("Camera", 250)).await.unwrap();
    let e = h
        .service
        .create_flash_sale_event(event(Duration::hours(1), Duration::hours(4), EventStatus::Ended))
        .await
        .unwrap();

    let err = h
        .service
        .create_flash_sale_event_product(allocation(&e.id, &p.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EventEnded);
}

#[tokio::test]
async fn inventory_against_open_event_round_trips() {
    let h = harness();
    let p = h.service.create_product(product("Speaker", 100)).await.unwrap();
    let e = h
        .service
        .create_flash_sale_event(event(Duration::hours(-1), Duration::hours(4), EventStatus::Active))
        .await
        .unwrap();

    let row = h
        .service
        .create_flash_sale_event_product(allocation(&e.id, &p.id))
        .await
        .unwrap();
    assert_eq!(row.sale_price, Decimal::new(70, 0));

    let mut next = row.clone();
    next.available_quantity = 2;
    let updated = h.service.update_flash_sale_event_product(next).await.unwrap();
    assert_eq!(updated.available_quantity, 2);

    let by_event = FlashSaleEventProductFilter {
        event_id: Some(e.id.as_str().to_string()),
        ..Default::default()
    };
    let listing = h
        .service
        .list_flash_sale_event_products(&by_event, Page::default())
        .await
        .unwrap();
    assert_eq!(listing.total, 1);

    let ack = h.service.delete_flash_sale_event_product(&row.id).await.unwrap();
    assert_eq!(ack, "Flash sale event product deleted successfully");
}

#[tokio::test]
async fn started_events_cannot_be_updated() {
    let h = harness();
    let future = h
        .service
        .create_flash_sale_event(event(Duration::hours(2), Duration::hours(6), EventStatus::Upcoming))
        .await
        .unwrap();
    let running = h
        .service
        .create_flash_sale_event(event(Duration::hours(-2), Duration::hours(6), EventStatus::Active))
        .await
        .unwrap();

    let mut renamed = future.clone();
    renamed.name = "Cyber Week".to_string();
    let updated = h.service.update_flash_sale_event(renamed).await.unwrap();
    assert_eq!(updated.name, "Cyber Week");

    let mut late = running.clone();
    late.status = EventStatus::Ended;
    let err = h.service.update_flash_sale_event(late).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        h.service.get_flash_sale_event(&running.id).await.unwrap().status,
        EventStatus::Active
    );
}

#[tokio::test]
async fn enumerated_filters_match_exactly() {
    let h = harness();
    h.service
        .create_flash_sale_event(event(Duration::hours(1), Duration::hours(2), EventStatus::Upcoming))
        .await
        .unwrap();
    h.service
        .create_flash_sale_event(event(Duration::hours(-1), Duration::hours(2), EventStatus::Active))
        .await
        .unwrap();

    let active = FlashSaleEventFilter {
        status: Some("ACTIVE".to_string()),
        ..Default::default()
    };
    let listing = h.service.list_flash_sale_events(&active, Page::default()).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].status, EventStatus::Active);

    let links = h
        .service
        .list_product_discounts(
            &ProductDiscountFilter {
                product_id: Some("nothing".to_string()),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(links.total, 0);
}

#[tokio::test]
async fn delete_acknowledgements_name_the_kind() {
    let h = harness();
    let d = h
        .service
        .create_discount(discount(DiscountType::Percentage, 10))
        .await
        .unwrap();
    let e = h
        .service
        .create_flash_sale_event(event(Duration::hours(1), Duration::hours(2), EventStatus::Upcoming))
        .await
        .unwrap();

    assert_eq!(
        h.service.delete_discount(&d.id).await.unwrap(),
        "Discount deleted successfully"
    );
    assert_eq!(
        h.service.delete_flash_sale_event(&e.id).await.unwrap(),
        "Flash sale event deleted successfully"
    );
    assert_eq!(
        h.service.delete_product_discount(&EntityId::new("missing")).await.unwrap(),
        "Product discount deleted successfully"
    );
}

#[tokio::test]
async fn invalid_input_is_a_validation_error() {
    let h = harness();
    let err = h
        .service
        .create_discount(discount(DiscountType::Unrecognized("BOGO".to_string()), 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().starts_with("failed to create discount: "));
}
