use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use flashsale_core::{DomainError, DomainResult};

use super::{Delivery, SubscriberDirectory};

/// Fixed subscriber list.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriberDirectory {
    addresses: Vec<String>,
}

impl InMemorySubscriberDirectory {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SubscriberDirectory for InMemorySubscriberDirectory {
    async fn addresses(&self) -> DomainResult<Vec<String>> {
        Ok(self.addresses.clone())
    }
}

/// Delivery that writes each message to the log and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

#[async_trait]
impl Delivery for LogDelivery {
    async fn deliver(&self, destination: &str, message: &str) -> DomainResult<()> {
        info!(destination = %destination, message = %message, "notification");
        Ok(())
    }
}

/// Delivery that records what it was asked to send.
///
/// Destinations registered with [`RecordingDelivery::failing_for`] fail instead.
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<(String, String)>>,
    failing: HashSet<String>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for<I, S>(destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: destinations.into_iter().map(Into::into).collect(),
        }
    }

    /// `(destination, message)` pairs in delivery order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn deliver(&self, destination: &str, message: &str) -> DomainResult<()> {
        if self.failing.contains(destination) {
            return Err(DomainError::delivery(format!("{destination} rejected the message")));
        }

        self.sent
            .lock()
            .map_err(|_| DomainError::delivery("recording lock poisoned"))?
            .push((destination.to_string(), message.to_string()));
        Ok(())
    }
}
