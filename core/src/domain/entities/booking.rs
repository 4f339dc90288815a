//! Booking entity: one rider's reservation of one cycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::trip_timer::TripTimer;
use crate::errors::{BookingError, DomainResult};

/// Booking identifier
pub type BookingId = u64;

/// Where a booking is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Reserved, cycle not yet handed over
    Current,
    /// Handoff verified, trip timer running
    Active,
    /// Trip ended, final duration recorded
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Current => write!(f, "current"),
            BookingStatus::Active => write!(f, "active"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A rider's booking of a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: BookingId,

    /// Display name of the cycle
    pub cycle_name: String,

    /// Name of the lender
    pub owner: String,

    /// Pickup location
    pub location: String,

    /// Price in rupees per hour
    pub price_per_hour: u64,

    /// Day the booking is for
    pub booking_date: Option<NaiveDate>,

    /// Code the lender shares at handoff
    pub handoff_code: Option<String>,

    /// Lifecycle status
    pub status: BookingStatus,

    /// Trip stopwatch
    pub timer: TripTimer,
}

impl Booking {
    /// Creates a current booking without a handoff code
    pub fn new(
        id: BookingId,
        cycle_name: impl Into<String>,
        owner: impl Into<String>,
        location: impl Into<String>,
        price_per_hour: u64,
    ) -> Self {
        Self {
            id,
            cycle_name: cycle_name.into(),
            owner: owner.into(),
            location: location.into(),
            price_per_hour,
            booking_date: None,
            handoff_code: None,
            status: BookingStatus::Current,
            timer: TripTimer::new(),
        }
    }

    /// Attaches the lender's handoff code
    pub fn with_handoff_code(mut self, code: impl Into<String>) -> Self {
        self.handoff_code = Some(code.into());
        self
    }

    /// Sets the booking date
    pub fn with_booking_date(mut self, date: NaiveDate) -> Self {
        self.booking_date = Some(date);
        self
    }

    /// The code a handoff challenge must be seeded with
    ///
    /// Only a current booking can be handed over.
    pub fn handoff_code(&self) -> Result<&str, BookingError> {
        self.expect_status(BookingStatus::Current)?;
        self.handoff_code
            .as_deref()
            .ok_or(BookingError::NoHandoffCode { id: self.id })
    }

    /// Starts the trip after a verified handoff
    pub fn start_trip(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.expect_status(BookingStatus::Current)?;
        self.timer.start(at)?;
        self.status = BookingStatus::Active;
        Ok(())
    }

    /// Ends the trip and returns the frozen `HH:MM:SS` duration
    pub fn end_trip(&mut self, at: DateTime<Utc>) -> DomainResult<String> {
        let duration = self.timer.stop(at)?.to_string();
        self.status = BookingStatus::Completed;
        Ok(duration)
    }

    /// Actual time used, available once the trip has ended
    pub fn actual_duration(&self) -> Option<&str> {
        self.timer.final_duration()
    }

    /// Shown in the "current" list (reserved or riding)
    pub fn is_upcoming_or_ongoing(&self) -> bool {
        matches!(self.status, BookingStatus::Current | BookingStatus::Active)
    }

    /// Fails with `InvalidStatus` unless the booking is in `expected`
    pub fn expect_status(&self, expected: BookingStatus) -> Result<(), BookingError> {
        if self.status != expected {
            return Err(BookingError::InvalidStatus {
                id: self.id,
                expected: expected.to_string(),
                actual: self.status.to_string(),
            });
        }
        Ok(())
    }
}
