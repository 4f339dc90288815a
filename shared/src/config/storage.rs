//! Key-value storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend used for the persisted key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// JSON document on disk
    File,
    /// Redis server
    Redis,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" | "json" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

/// Key-value storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the JSON document for the file backend
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Prefix prepended to every key
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Retry attempts for remote backends
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            file_path: default_file_path(),
            redis_url: default_redis_url(),
            key_prefix: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl StorageConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let backend = std::env::var("LOOP_STORAGE_BACKEND")
            .ok()
            .and_then(|b| b.parse().ok())
            .unwrap_or_default();
        let file_path = std::env::var("LOOP_STORAGE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_file_path());
        let redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| default_redis_url());
        let key_prefix = std::env::var("LOOP_STORAGE_KEY_PREFIX").ok();

        Self {
            backend,
            file_path,
            redis_url,
            key_prefix,
            ..Default::default()
        }
    }

    /// Build the full key for a logical key
    pub fn prefixed_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, key),
            _ => key.to_string(),
        }
    }
}

fn default_file_path() -> PathBuf {
    PathBuf::from("data/loop-store.json")
}

fn default_redis_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
