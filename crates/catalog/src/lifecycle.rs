//! Gate for inventory records that hang off a flash sale event.

use chrono::{DateTime, Utc};

use flashsale_core::{DomainError, DomainResult};

use crate::flash_sale_event::FlashSaleEvent;

/// Reject inventory writes against an event that is closed.
///
/// ENDED status wins over expiry. Expiry is checked on its own, so an event whose
/// status was never moved to ENDED is still rejected once `end_time` has passed.
pub fn ensure_open_for_inventory(event: &FlashSaleEvent, now: DateTime<Utc>) -> DomainResult<()> {
    if event.has_ended() {
        return Err(DomainError::EventEnded(format!(
            "flash sale event {} has ended",
            event.id
        )));
    }
    if event.has_expired(now) {
        return Err(DomainError::EventExpired(format!(
            "flash sale event {} expired at {}",
            event.id,
            event.end_time.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash_sale_event::{EventStatus, EventType, NewFlashSaleEvent};
    use chrono::Duration;
    use flashsale_core::{materialize, ErrorKind};

    fn event(end_in: Duration, status: EventStatus) -> FlashSaleEvent {
        let now = Utc::now();
        materialize(
            NewFlashSaleEvent {
                id: Some("evt-1".into()),
                name: "Doorbusters".to_string(),
                description: String::new(),
                start_time: now - Duration::hours(2),
                end_time: now + end_in,
                status,
                event_type: EventType::FlashSale,
            },
            now,
        )
        .unwrap()
    }

    #[test]
    fn open_event_passes() {
        let e = event(Duration::hours(1), EventStatus::Active);
        assert!(ensure_open_for_inventory(&e, Utc::now()).is_ok());
    }

    #[test]
    fn ended_status_is_rejected() {
        let e = event(Duration::hours(1), EventStatus::Ended);
        let err = ensure_open_for_inventory(&e, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EventEnded);
    }

    #[test]
    fn lapsed_window_is_rejected_regardless_of_status() {
        let e = event(Duration::hours(-1), EventStatus::Upcoming);
        let err = ensure_open_for_inventory(&e, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EventExpired);
    }

    #[test]
    fn end_time_equal_to_now_is_still_open() {
        let e = event(Duration::hours(1), EventStatus::Active);
        assert!(ensure_open_for_inventory(&e, e.end_time).is_ok());
    }
}
