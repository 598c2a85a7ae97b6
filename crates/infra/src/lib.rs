//! Infrastructure layer: entity store backends, notification fanout, config and
//! the catalog service that ties them together.

pub mod config;
pub mod notify;
pub mod service;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::{Config, ConfigError, StorageBackend};
pub use notify::{NotificationConfig, Notifier};
pub use service::{CatalogService, ServiceError, ServiceResult};
pub use store::{Repository, Storage};
