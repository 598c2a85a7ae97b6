//! Domain error model.

use thiserror::Error;

/// Result type used across the catalog layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Stable, caller-visible classification of a failure.
///
/// Every [`DomainError`] maps to exactly one kind; transports use the kind to pick
/// status codes and error tags without parsing messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    EventNotFound,
    EventEnded,
    EventExpired,
    StoreUnavailable,
    Delivery,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::EventNotFound => "event_not_found",
            ErrorKind::EventEnded => "event_ended",
            ErrorKind::EventExpired => "event_expired",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::Delivery => "delivery_error",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog error.
///
/// Business failures (validation, lifecycle rejections, conflicts) and the two
/// boundary failures the core has to report (storage and delivery) share one enum
/// so a failure keeps its kind while it is wrapped with context on the way up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No live record matches the id/condition.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input was structurally invalid.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Duplicate identifier on create.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The flash sale event referenced by an inventory row does not exist (or is deleted).
    #[error("flash sale event not found: {0}")]
    EventNotFound(String),

    /// The referenced flash sale event has status ENDED.
    #[error("flash sale event has ended: {0}")]
    EventEnded(String),

    /// The referenced flash sale event's end time has already passed.
    #[error("flash sale event has expired: {0}")]
    EventExpired(String),

    /// Backend connectivity or query failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Notification transport failure.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::EventNotFound(_) => ErrorKind::EventNotFound,
            DomainError::EventEnded(_) => ErrorKind::EventEnded,
            DomainError::EventExpired(_) => ErrorKind::EventExpired,
            DomainError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            DomainError::Delivery(_) => ErrorKind::Delivery,
        }
    }
}
