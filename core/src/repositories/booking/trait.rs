//! Booking repository trait defining the interface for booking persistence.

use async_trait::async_trait;

use crate::domain::entities::booking::{Booking, BookingId};
use crate::errors::DomainError;

/// Repository trait for Booking persistence operations
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find a booking by its ID
    ///
    /// # Arguments
    /// * `id` - The booking ID
    ///
    /// # Returns
    /// * `Ok(Some(Booking))` if found
    /// * `Ok(None)` if no booking has that ID
    /// * `Err(DomainError)` if the lookup fails
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, DomainError>;

    /// Insert or replace a booking
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// All bookings ordered by ID
    async fn list(&self) -> Result<Vec<Booking>, DomainError>;
}
