//! Infrastructure wiring: storage backend, subscriber directory and delivery
//! chosen from [`Config`], composed into one shared [`CatalogService`].

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use flashsale_infra::notify::{
    Delivery, InMemorySubscriberDirectory, LogDelivery, PostgresSubscriberDirectory,
    SubscriberDirectory,
};
use flashsale_infra::{CatalogService, Config, Notifier, Storage, StorageBackend};

pub async fn build_services(config: &Config) -> anyhow::Result<Arc<CatalogService>> {
    let (storage, directory): (Storage, Arc<dyn SubscriberDirectory>) = match config.storage {
        StorageBackend::Memory => (
            Storage::in_memory(),
            Arc::new(InMemorySubscriberDirectory::new(config.subscribers.clone())),
        ),
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.postgres.max_connections)
                .connect(&config.postgres.url)
                .await?;
            tracing::info!(max_connections = config.postgres.max_connections, "connected to postgres");
            (
                Storage::postgres(pool.clone()),
                Arc::new(PostgresSubscriberDirectory::new(pool)),
            )
        }
    };

    let delivery = build_delivery(config)?;
    let notifier = Notifier::new(directory, delivery, config.notification.clone());

    Ok(Arc::new(CatalogService::new(storage, Arc::new(notifier))))
}

/// In-process services over the in-memory backend (tests/dev).
pub fn in_memory_services(
    directory: Arc<dyn SubscriberDirectory>,
    delivery: Arc<dyn Delivery>,
) -> Arc<CatalogService> {
    let notifier = Notifier::new(directory, delivery, Default::default());
    Arc::new(CatalogService::new(Storage::in_memory(), Arc::new(notifier)))
}

#[cfg(feature = "redis")]
fn build_delivery(config: &Config) -> anyhow::Result<Arc<dyn Delivery>> {
    match &config.redis_url {
        Some(url) => {
            let delivery = flashsale_infra::notify::RedisDelivery::new(
                url,
                config.notification.key_prefix.clone(),
            )?;
            Ok(Arc::new(delivery))
        }
        None => Ok(Arc::new(LogDelivery)),
    }
}

#[cfg(not(feature = "redis"))]
fn build_delivery(config: &Config) -> anyhow::Result<Arc<dyn Delivery>> {
    if config.redis_url.is_some() {
        tracing::warn!("REDIS_URL is set but the redis feature is disabled; logging notifications instead");
    }
    Ok(Arc::new(LogDelivery))
}
