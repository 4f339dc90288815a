//! Redis-backed key-value store
//!
//! Uses a multiplexed connection with retry and exponential backoff, both
//! when connecting and for each command.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use loop_core::errors::DomainError;
use loop_core::repositories::KeyValueStore;
use loop_shared::config::StorageConfig;

use crate::InfrastructureError;

/// Upper bound for the backoff delay
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis key-value store
#[derive(Clone)]
pub struct RedisStore {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Storage configuration (URL, key prefix, retry policy)
    config: StorageConfig,
}

impl RedisStore {
    /// Connects to Redis
    ///
    /// # Arguments
    /// * `config` - Storage configuration; `redis_url`, `key_prefix`,
    ///   `max_retries` and `retry_delay_ms` are used
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Connected store or error
    pub async fn connect(config: StorageConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.redis_url), "Creating Redis store");

        let client = Client::open(config.redis_url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis store connected");
        Ok(Self { connection, config })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;
        Ok(response == "PONG")
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let key = self.config.prefixed_key(key);
        debug!("Getting key '{}'", key);

        let value = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.get::<_, Option<String>>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let key = self.config.prefixed_key(key);
        debug!("Setting key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.clone();
            let value = value.to_string();
            Box::pin(async move { conn.set::<_, _, ()>(key, value).await })
        })
        .await
        .map_err(InfrastructureError::Cache)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let key = self.config.prefixed_key(key);
        debug!("Deleting key '{}'", key);

        let deleted = self
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;
        Ok(deleted > 0)
    }
}

/// Errors worth retrying: connection trouble and transient server states
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hides credentials in a Redis URL
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.find('@'), url.find("://")) {
        return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
    }
    url.to_string()
}
