//! Mock implementation of BookingRepository for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::booking::{Booking, BookingId};
use crate::errors::DomainError;

use super::BookingRepository;

/// Mock booking repository backed by an ordered map
#[derive(Clone)]
pub struct MockBookingRepository {
    bookings: Arc<Mutex<BTreeMap<BookingId, Booking>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockBookingRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            bookings: Arc::new(Mutex::new(BTreeMap::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a repository seeded with bookings
    pub fn with_bookings(bookings: impl IntoIterator<Item = Booking>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.bookings.lock().unwrap();
            for booking in bookings {
                map.insert(booking.id, booking);
            }
        }
        repo
    }

    /// Set whether operations should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Stored booking, bypassing failure injection
    pub fn get(&self, id: BookingId) -> Option<Booking> {
        self.bookings.lock().unwrap().get(&id).cloned()
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, DomainError> {
        self.check_failure()?;
        Ok(self.bookings.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        self.check_failure()?;
        self.bookings
            .lock()
            .unwrap()
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Booking>, DomainError> {
        self.check_failure()?;
        Ok(self.bookings.lock().unwrap().values().cloned().collect())
    }
}
