use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use flashsale_core::DomainResult;

use super::SubscriberDirectory;
use crate::store::postgres::map_sqlx_error;

/// Subscribers are every registered user's email.
#[derive(Debug, Clone)]
pub struct PostgresSubscriberDirectory {
    pool: Arc<PgPool>,
}

impl PostgresSubscriberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self::from_shared(Arc::new(pool))
    }

    pub fn from_shared(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberDirectory for PostgresSubscriberDirectory {
    #[instrument(skip(self), err)]
    async fn addresses(&self) -> DomainResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT email FROM users")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_subscriber_emails", e))
    }
}
