use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use flashsale_core::{DomainError, DomainResult, Entity, EntityId, FilterSet, Record, RecordMeta, Value};

use crate::require_text;

/// Column names shared by filters and storage backends.
pub mod columns {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const STATUS: &str = "status";
    pub const EVENT_TYPE: &str = "event_type";
}

/// Caller-assigned event status. Never derived from the time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Upcoming,
    Active,
    Ended,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "UPCOMING",
            EventStatus::Active => "ACTIVE",
            EventStatus::Ended => "ENDED",
        }
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPCOMING" => Ok(EventStatus::Upcoming),
            "ACTIVE" => Ok(EventStatus::Active),
            "ENDED" => Ok(EventStatus::Ended),
            other => Err(DomainError::validation(format!("unknown event status '{other}'"))),
        }
    }
}

impl core::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    FlashSale,
    Promotion,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::FlashSale => "FLASH_SALE",
            EventType::Promotion => "PROMOTION",
        }
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FLASH_SALE" => Ok(EventType::FlashSale),
            "PROMOTION" => Ok(EventType::Promotion),
            other => Err(DomainError::validation(format!("unknown event type '{other}'"))),
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-bounded sale that flash sale inventory hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashSaleEvent {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: EventStatus,
    pub event_type: EventType,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

impl FlashSaleEvent {
    pub fn has_ended(&self) -> bool {
        self.status == EventStatus::Ended
    }

    /// `end_time` strictly before `now`.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_time < now
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }
}

/// Create input for [`FlashSaleEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashSaleEvent {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: EventStatus,
    pub event_type: EventType,
}

/// List criteria for events. `start_time` is a lower bound on the start, `end_time`
/// an upper bound on the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashSaleEventFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub event_type: Option<String>,
}

impl Entity for FlashSaleEvent {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for FlashSaleEvent {
    type New = NewFlashSaleEvent;
    type Filter = FlashSaleEventFilter;

    const KIND: &'static str = "flash sale event";

    fn assemble(id: EntityId, new: NewFlashSaleEvent, meta: RecordMeta) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            start_time: new.start_time,
            end_time: new.end_time,
            status: new.status,
            event_type: new.event_type,
            meta,
        }
    }

    fn requested_id(new: &NewFlashSaleEvent) -> Option<&EntityId> {
        new.id.as_ref()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)
    }

    fn filter_set(filter: &FlashSaleEventFilter) -> FilterSet {
        FilterSet::new()
            .contains(columns::NAME, filter.name.as_deref())
            .contains(columns::DESCRIPTION, filter.description.as_deref())
            .not_before(columns::START_TIME, filter.start_time)
            .not_after(columns::END_TIME, filter.end_time)
            .equals_text(columns::STATUS, filter.status.as_deref())
            .equals_text(columns::EVENT_TYPE, filter.event_type.as_deref())
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            columns::NAME => Some(Value::from(self.name.as_str())),
            columns::DESCRIPTION => Some(Value::from(self.description.as_str())),
            columns::START_TIME => Some(Value::from(self.start_time)),
            columns::END_TIME => Some(Value::from(self.end_time)),
            columns::STATUS => Some(Value::from(self.status.as_str())),
            columns::EVENT_TYPE => Some(Value::from(self.event_type.as_str())),
            _ => None,
        }
    }

    /// Only events that have not started, have not expired and are not ENDED can be
    /// rewritten.
    fn accepts_update(&self, now: DateTime<Utc>) -> bool {
        !self.has_started(now) && !self.has_expired(now) && !self.has_ended()
    }
}
