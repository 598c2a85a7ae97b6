//! Redis-backed delivery: each message is pushed onto a per-destination list.
//!
//! Key layout: `<prefix>:<destination>` (e.g. `notifications:broadcast`). Consumers
//! pop from the list; nothing here waits for them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use flashsale_core::{DomainError, DomainResult};

use super::Delivery;

#[derive(Debug, Clone)]
pub struct RedisDelivery {
    client: Arc<redis::Client>,
    key_prefix: String,
}

impl RedisDelivery {
    /// `redis_url` e.g. `"redis://localhost:6379"`.
    pub fn new(redis_url: impl AsRef<str>, key_prefix: impl Into<String>) -> DomainResult<Self> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| DomainError::delivery(format!("invalid redis url: {e}")))?;
        Ok(Self {
            client: Arc::new(client),
            key_prefix: key_prefix.into(),
        })
    }

    pub fn key_for(&self, destination: &str) -> String {
        format!("{}:{}", self.key_prefix, destination)
    }
}

#[async_trait]
impl Delivery for RedisDelivery {
    #[instrument(skip(self, message), fields(key = %self.key_for(destination)), err)]
    async fn deliver(&self, destination: &str, message: &str) -> DomainResult<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| DomainError::delivery(format!("redis connection error: {e}")))?;

        let _: i64 = redis::cmd("RPUSH")
            .arg(self.key_for(destination))
            .arg(message)
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::delivery(format!("redis RPUSH failed: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_per_destination() {
        let delivery = RedisDelivery::new("redis://localhost:6379", "notifications").unwrap();
        assert_eq!(delivery.key_for("broadcast"), "notifications:broadcast");
    }
}
