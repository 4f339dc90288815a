//! Mock implementation of KeyValueStore for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::errors::DomainError;

use super::KeyValueStore;

/// In-process key-value store with failure injection
#[derive(Clone)]
pub struct MockKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockKeyValueStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.entries.lock().unwrap();
            for (key, value) in entries {
                map.insert(key.into(), value.into());
            }
        }
        store
    }

    /// Set whether operations should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Snapshot of a stored value, bypassing failure injection
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::Internal {
                message: "Mock store error".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check_failure()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.check_failure()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        self.check_failure()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}
