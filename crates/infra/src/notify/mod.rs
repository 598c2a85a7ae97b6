//! Best-effort notification fanout.
//!
//! Two collaborators sit behind traits: a [`SubscriberDirectory`] that lists the
//! current recipients and a [`Delivery`] that pushes one message to one destination.
//! [`Notifier`] composes them with the process-wide [`NotificationConfig`], which is
//! injected once at construction and never reloaded.
//!
//! Delivery is sequential. The first failure aborts the remaining recipients; the
//! error reports how many were reached before it. Dropping the future stops the loop.

pub mod in_memory;
pub mod message;
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis_list;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use flashsale_core::{DomainError, DomainResult};

pub use in_memory::{InMemorySubscriberDirectory, LogDelivery, RecordingDelivery};
pub use message::{DiscountAlert, EventAnnouncement};
pub use postgres::PostgresSubscriberDirectory;
#[cfg(feature = "redis")]
pub use redis_list::RedisDelivery;

/// Default logical destination for broadcasts.
pub const DEFAULT_BROADCAST_DESTINATION: &str = "broadcast";

/// Default key prefix for queue-style deliveries.
pub const DEFAULT_KEY_PREFIX: &str = "notifications";

/// Source of subscriber addresses. Fetched fresh on every fanout.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    async fn addresses(&self) -> DomainResult<Vec<String>>;
}

/// Transport for one message to one destination.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, destination: &str, message: &str) -> DomainResult<()>;
}

/// Notification settings, loaded once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub broadcast_destination: String,
    pub key_prefix: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            broadcast_destination: DEFAULT_BROADCAST_DESTINATION.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// A fanout that stopped at its first failed recipient.
#[derive(Debug, thiserror::Error)]
#[error("delivery to {destination} failed after {delivered} of {total} recipients: {source}")]
pub struct FanoutError {
    pub destination: String,
    pub delivered: usize,
    pub total: usize,
    #[source]
    pub source: DomainError,
}

impl From<FanoutError> for DomainError {
    fn from(err: FanoutError) -> Self {
        DomainError::delivery(err.to_string())
    }
}

pub struct Notifier {
    directory: Arc<dyn SubscriberDirectory>,
    delivery: Arc<dyn Delivery>,
    config: NotificationConfig,
}

impl Notifier {
    pub fn new(
        directory: Arc<dyn SubscriberDirectory>,
        delivery: Arc<dyn Delivery>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            directory,
            delivery,
            config,
        }
    }

    /// Deliver to the single broadcast destination.
    #[instrument(skip(self, message), fields(destination = %self.config.broadcast_destination), err)]
    pub async fn broadcast(&self, message: &str) -> DomainResult<()> {
        self.delivery
            .deliver(&self.config.broadcast_destination, message)
            .await
    }

    /// Deliver to every current subscriber, in directory order.
    ///
    /// Returns the number of recipients reached. A directory failure is returned
    /// as-is; a delivery failure becomes a [`FanoutError`].
    #[instrument(skip(self, message), fields(recipients), err)]
    pub async fn fanout(&self, message: &str) -> DomainResult<usize> {
        let recipients = self.directory.addresses().await?;
        tracing::Span::current().record("recipients", recipients.len());

        let total = recipients.len();
        for (delivered, destination) in recipients.iter().enumerate() {
            if let Err(source) = self.delivery.deliver(destination, message).await {
                return Err(FanoutError {
                    destination: destination.clone(),
                    delivered,
                    total,
                    source,
                }
                .into());
            }
            debug!(destination = %destination, "notification delivered");
        }

        Ok(total)
    }
}

impl core::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(
        subscribers: &[&str],
        failing: &[&str],
    ) -> (Notifier, Arc<RecordingDelivery>) {
        let delivery = Arc::new(RecordingDelivery::failing_for(failing.iter().copied()));
        let notifier = Notifier::new(
            Arc::new(InMemorySubscriberDirectory::new(subscribers.iter().copied())),
            delivery.clone(),
            NotificationConfig::default(),
        );
        (notifier, delivery)
    }

    #[tokio::test]
    async fn broadcast_goes_to_the_configured_destination() {
        let (notifier, delivery) = notifier(&[], &[]);
        notifier.broadcast("hello").await.unwrap();

        assert_eq!(
            delivery.sent(),
            vec![("broadcast".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn fanout_reaches_every_subscriber_in_order() {
        let (notifier, delivery) = notifier(&["a@x.io", "b@x.io", "c@x.io"], &[]);
        let reached = notifier.fanout("sale!").await.unwrap();

        assert_eq!(reached, 3);
        let destinations: Vec<_> = delivery.sent().into_iter().map(|(d, _)| d).collect();
        assert_eq!(destinations, vec!["a@x.io", "b@x.io", "c@x.io"]);
    }

    #[tokio::test]
    async fn first_failure_stops_the_fanout() {
        let (notifier, delivery) = notifier(&["a@x.io", "b@x.io", "c@x.io"], &["b@x.io"]);
        let err = notifier.fanout("sale!").await.unwrap_err();

        assert!(matches!(err, DomainError::Delivery(_)));
        assert!(err.to_string().contains("after 1 of 3 recipients"));
        assert_eq!(delivery.sent().len(), 1);
    }

    #[tokio::test]
    async fn empty_directory_is_a_successful_noop() {
        let (notifier, delivery) = notifier(&[], &[]);
        assert_eq!(notifier.fanout("sale!").await.unwrap(), 0);
        assert!(delivery.sent().is_empty());
    }
}
