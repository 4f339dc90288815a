//! Trip timer entity: a stopwatch that runs from verified handoff to end of trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loop_shared::utils::format_hms;

use crate::errors::TripError;

/// Stopwatch owned by exactly one booking
///
/// Elapsed time is never stored while the trip runs; it is derived from the
/// start instant on every sample. Stopping freezes the duration in
/// `HH:MM:SS` form and the timer cannot be started again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTimer {
    start_instant: Option<DateTime<Utc>>,
    end_instant: Option<DateTime<Utc>>,
    is_active: bool,
    final_seconds: Option<u64>,
    final_duration: Option<String>,
}

impl TripTimer {
    /// Creates an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the trip at `at`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The timer is now active
    /// * `Err(TripError::AlreadyActive)` - A trip is in progress; it is left untouched
    /// * `Err(TripError::AlreadyCompleted)` - The final duration has already been recorded
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), TripError> {
        if self.is_active {
            return Err(TripError::AlreadyActive);
        }
        if self.final_duration.is_some() {
            return Err(TripError::AlreadyCompleted);
        }

        self.start_instant = Some(at);
        self.is_active = true;
        Ok(())
    }

    /// Whole seconds since the start while active, 0 otherwise
    pub fn sample_elapsed(&self, now: DateTime<Utc>) -> u64 {
        match (self.is_active, self.start_instant) {
            (true, Some(start)) => seconds_between(start, now),
            _ => 0,
        }
    }

    /// Live `HH:MM:SS` label for display
    pub fn formatted_elapsed(&self, now: DateTime<Utc>) -> String {
        format_hms(self.sample_elapsed(now))
    }

    /// Stops the trip at `at` and freezes the final duration
    ///
    /// # Returns
    ///
    /// * `Ok(&str)` - The formatted final duration
    /// * `Err(TripError::NotActive)` - The timer is not running; nothing changes
    pub fn stop(&mut self, at: DateTime<Utc>) -> Result<&str, TripError> {
        let start = match (self.is_active, self.start_instant) {
            (true, Some(start)) => start,
            _ => return Err(TripError::NotActive),
        };

        let seconds = seconds_between(start, at);
        self.is_active = false;
        self.end_instant = Some(at);
        self.final_seconds = Some(seconds);
        let duration = self.final_duration.insert(format_hms(seconds));
        Ok(duration.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// A final duration has been recorded
    pub fn is_completed(&self) -> bool {
        self.final_duration.is_some()
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start_instant
    }

    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.end_instant
    }

    pub fn final_duration(&self) -> Option<&str> {
        self.final_duration.as_deref()
    }

    pub fn final_seconds(&self) -> Option<u64> {
        self.final_seconds
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_seconds().max(0) as u64
}
