//! Key-value store backends
//!
//! `open_store` picks the backend named in `StorageConfig` and returns it as
//! a `ConfiguredStore`, which the core services can use directly.

mod file;
mod memory;
#[cfg(feature = "redis-store")]
mod redis_store;

#[cfg(test)]
mod tests;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisStore;

use async_trait::async_trait;
use tracing::info;

use loop_core::errors::DomainError;
use loop_core::repositories::KeyValueStore;
use loop_shared::config::{StorageBackend, StorageConfig};

use crate::InfrastructureError;

/// The store selected by configuration
pub enum ConfiguredStore {
    Memory(MemoryStore),
    File(FileStore),
    #[cfg(feature = "redis-store")]
    Redis(RedisStore),
}

impl ConfiguredStore {
    pub fn backend(&self) -> StorageBackend {
        match self {
            ConfiguredStore::Memory(_) => StorageBackend::Memory,
            ConfiguredStore::File(_) => StorageBackend::File,
            #[cfg(feature = "redis-store")]
            ConfiguredStore::Redis(_) => StorageBackend::Redis,
        }
    }

    fn inner(&self) -> &dyn KeyValueStore {
        match self {
            ConfiguredStore::Memory(store) => store,
            ConfiguredStore::File(store) => store,
            #[cfg(feature = "redis-store")]
            ConfiguredStore::Redis(store) => store,
        }
    }
}

/// Opens the backend named by `config.backend`
pub async fn open_store(config: &StorageConfig) -> Result<ConfiguredStore, InfrastructureError> {
    let store = match config.backend {
        StorageBackend::Memory => ConfiguredStore::Memory(MemoryStore::new()),
        StorageBackend::File => ConfiguredStore::File(FileStore::open(&config.file_path).await?),
        #[cfg(feature = "redis-store")]
        StorageBackend::Redis => ConfiguredStore::Redis(RedisStore::connect(config.clone()).await?),
        #[cfg(not(feature = "redis-store"))]
        StorageBackend::Redis => {
            return Err(InfrastructureError::Config(
                "Redis storage requires the `redis-store` feature".to_string(),
            ))
        }
    };

    info!(backend = ?store.backend(), "Key-value store ready");
    Ok(store)
}

#[async_trait]
impl KeyValueStore for ConfiguredStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner().get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.inner().set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        self.inner().remove(key).await
    }
}
