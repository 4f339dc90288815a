//! Key-value store persisted as a JSON object on disk
//!
//! The whole map is kept in memory and rewritten on every change. Writes go
//! to a sibling temporary file that is then renamed over the target; the
//! in-memory map only changes once the rename has succeeded.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use loop_core::errors::DomainError;
use loop_core::repositories::KeyValueStore;

use crate::InfrastructureError;

/// JSON file backed key-value store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store, loading existing entries if the file exists
    ///
    /// # Arguments
    /// * `path` - Location of the JSON file; parent directories are created
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - The store, or an I/O or JSON error
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, InfrastructureError> {
        let path = path.into();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            keys = entries.len(),
            "File store opened"
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), InfrastructureError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), keys = entries.len(), "File store written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());

        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);

        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }
}
