//! Booking repository stored in any key-value store
//!
//! Each booking is a JSON document under `booking:{id}`; the set of known IDs
//! is a JSON array under `bookings`.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use loop_core::domain::entities::{Booking, BookingId};
use loop_core::errors::{DomainError, StorageError};
use loop_core::repositories::{BookingRepository, KeyValueStore};

/// Key of the booking ID index
pub const INDEX_KEY: &str = "bookings";

fn booking_key(id: BookingId) -> String {
    format!("booking:{}", id)
}

/// Booking repository backed by a key-value store
pub struct KvBookingRepository<S: KeyValueStore> {
    store: Arc<S>,
    /// Serialises index updates
    index_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvBookingRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            index_lock: Mutex::new(()),
        }
    }

    async fn read_index(&self) -> Result<BTreeSet<BookingId>, DomainError> {
        match self.store.get(INDEX_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization {
                    key: INDEX_KEY.to_string(),
                    message: e.to_string(),
                }
                .into()
            }),
            None => Ok(BTreeSet::new()),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> BookingRepository for KvBookingRepository<S> {
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, DomainError> {
        let key = booking_key(id);
        let Some(json) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let booking: Booking = serde_json::from_str(&json).map_err(|e| StorageError::Serialization {
            key,
            message: e.to_string(),
        })?;
        Ok(Some(booking))
    }

    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let key = booking_key(booking.id);
        let json = serde_json::to_string(booking).map_err(|e| StorageError::Serialization {
            key: key.clone(),
            message: e.to_string(),
        })?;

        let _guard = self.index_lock.lock().await;
        self.store.set(&key, &json).await?;

        let mut index = self.read_index().await?;
        if index.insert(booking.id) {
            let index_json =
                serde_json::to_string(&index).map_err(|e| StorageError::Serialization {
                    key: INDEX_KEY.to_string(),
                    message: e.to_string(),
                })?;
            self.store.set(INDEX_KEY, &index_json).await?;
        }

        debug!(booking_id = booking.id, status = %booking.status, "Booking saved");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Booking>, DomainError> {
        let index = self.read_index().await?;
        let mut bookings = Vec::with_capacity(index.len());

        for id in index {
            match self.find_by_id(id).await? {
                Some(booking) => bookings.push(booking),
                None => warn!(booking_id = id, "Indexed booking is missing"),
            }
        }
        Ok(bookings)
    }
}
