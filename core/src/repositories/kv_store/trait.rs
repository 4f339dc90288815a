//! Key-value store trait for the small amount of device-local state the app keeps.

use async_trait::async_trait;

use crate::errors::DomainError;

/// String-keyed persistence for wallet flags, balances and serialized records
///
/// Values are stored verbatim; callers own their encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists
    /// * `Ok(None)` if it does not
    /// * `Err(DomainError)` if the backend fails
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Delete a key
    ///
    /// # Returns
    /// * `Ok(true)` if a value was removed
    /// * `Ok(false)` if the key did not exist
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;
}
