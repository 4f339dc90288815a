//! Trip service: ties handoff verification to the booking's trip timer.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tracing::{error, info};

use loop_shared::config::{OtpConfig, TripConfig};
use loop_shared::utils::mask_code;

use crate::domain::entities::booking::{Booking, BookingId, BookingStatus};
use crate::domain::entities::otp_challenge::OtpChallenge;
use crate::domain::events::TripEvent;
use crate::errors::{BookingError, DomainResult};
use crate::repositories::BookingRepository;
use crate::services::clock::Clock;
use crate::services::handoff::HandoffSession;
use crate::services::ticker::PeriodicTask;

/// A running trip's live elapsed-time publisher
struct LiveTrip {
    sampler: PeriodicTask,
    elapsed: watch::Receiver<u64>,
}

/// Booking trip lifecycle: handoff, live timing and end of trip
pub struct TripService<R: BookingRepository, C: Clock + 'static> {
    /// Booking persistence
    repository: Arc<R>,
    /// Source of trip start and end instants
    clock: Arc<C>,
    /// Handoff challenge settings
    otp_config: OtpConfig,
    /// Live sampling settings
    trip_config: TripConfig,
    /// Samplers for trips started by this service
    live: Mutex<HashMap<BookingId, LiveTrip>>,
}

impl<R: BookingRepository, C: Clock + 'static> TripService<R, C> {
    /// Create a new trip service
    ///
    /// # Arguments
    ///
    /// * `repository` - Booking repository implementation
    /// * `clock` - Clock used for trip start and end instants
    /// * `otp_config` - Handoff challenge configuration
    /// * `trip_config` - Live timer configuration
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        otp_config: OtpConfig,
        trip_config: TripConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            otp_config,
            trip_config,
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Loads a booking or reports it missing
    pub async fn booking(&self, booking_id: BookingId) -> DomainResult<Booking> {
        self.repository
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound { id: booking_id }.into())
    }

    /// Generates and stores a fresh handoff code for a current booking
    ///
    /// # Returns
    ///
    /// The code the lender shares with the rider
    pub async fn issue_handoff_code(&self, booking_id: BookingId) -> DomainResult<String> {
        let mut booking = self.booking(booking_id).await?;
        if booking.status != BookingStatus::Current {
            return Err(BookingError::InvalidStatus {
                id: booking_id,
                expected: BookingStatus::Current.to_string(),
                actual: booking.status.to_string(),
            }
            .into());
        }

        let code = OtpChallenge::generate_code(self.otp_config.code_length);
        booking.handoff_code = Some(code.clone());
        self.repository.save(&booking).await?;

        info!(
            event = "handoff_code_issued",
            booking_id,
            code = %mask_code(&code),
            "Handoff code issued"
        );
        Ok(code)
    }

    /// Opens a handoff session seeded with the booking's code
    pub async fn begin_handoff(&self, booking_id: BookingId) -> DomainResult<HandoffSession> {
        let booking = self.booking(booking_id).await?;
        let code = booking.handoff_code()?;

        let clock: Arc<dyn Clock> = self.clock.clone();
        HandoffSession::open(booking_id, code, self.otp_config.clone(), clock)
    }

    /// Verifies the session's entered code and starts the trip
    ///
    /// The booking must be `Current` before the code is checked. The session
    /// is closed only once the trip has started, so a failed start can be
    /// retried on the same session.
    ///
    /// # Returns
    ///
    /// * `Ok(TripEvent::Started)` - The booking is now active and timed
    /// * `Err(DomainError::Otp)` - Verification failed; the session stays open
    /// * `Err(DomainError)` - The trip could not start; the session stays open
    pub async fn confirm_handoff(&self, session: &mut HandoffSession) -> DomainResult<TripEvent> {
        let booking_id = session.booking_id();
        self.booking(booking_id)
            .await?
            .expect_status(BookingStatus::Current)?;

        let event = session.confirm().await?;

        if let Err(e) = self.start_trip(booking_id, event.at()).await {
            error!(
                event = "trip_start_failed",
                booking_id,
                error = %e,
                "Handoff verified but trip could not start"
            );
            return Err(e);
        }

        session.close().await;
        Ok(event)
    }

    /// Activates the booking's timer at `at` and starts live sampling
    pub async fn start_trip(
        &self,
        booking_id: BookingId,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut booking = self.booking(booking_id).await?;
        booking.start_trip(at)?;
        self.repository.save(&booking).await?;

        let live = self.spawn_sampler(&booking);
        if let Some(previous) = self.live.lock().await.insert(booking_id, live) {
            previous.sampler.cancel();
        }

        info!(
            event = "trip_started",
            booking_id,
            cycle = %booking.cycle_name,
            started_at = %at,
            "Trip started"
        );
        Ok(())
    }

    /// Receiver that sees the elapsed seconds of a running trip
    ///
    /// `None` when the trip is not running in this service.
    pub async fn live_elapsed(&self, booking_id: BookingId) -> Option<watch::Receiver<u64>> {
        self.live
            .lock()
            .await
            .get(&booking_id)
            .map(|trip| trip.elapsed.clone())
    }

    /// One-off sample of a trip's elapsed seconds (0 unless active)
    pub async fn elapsed(&self, booking_id: BookingId) -> DomainResult<u64> {
        let booking = self.booking(booking_id).await?;
        Ok(booking.timer.sample_elapsed(self.clock.now()))
    }

    /// Ends a running trip and freezes its duration
    ///
    /// # Returns
    ///
    /// * `Ok(TripEvent::Ended)` - Carries the `HH:MM:SS` duration
    /// * `Err(DomainError::Trip(TripError::NotActive))` - No trip is running
    pub async fn end_trip(&self, booking_id: BookingId) -> DomainResult<TripEvent> {
        let mut booking = self.booking(booking_id).await?;
        let at = self.clock.now();
        let duration = booking.end_trip(at)?;
        let seconds = booking.timer.final_seconds().unwrap_or_default();
        self.repository.save(&booking).await?;

        if let Some(trip) = self.live.lock().await.remove(&booking_id) {
            trip.sampler.shutdown().await;
        }

        info!(
            event = "trip_ended",
            booking_id,
            duration = %duration,
            seconds,
            "Trip ended"
        );

        Ok(TripEvent::Ended {
            booking_id,
            at,
            duration,
            seconds,
        })
    }

    /// Bookings that are reserved or riding
    pub async fn current_bookings(&self) -> DomainResult<Vec<Booking>> {
        let bookings = self.repository.list().await?;
        Ok(bookings
            .into_iter()
            .filter(Booking::is_upcoming_or_ongoing)
            .collect())
    }

    /// Completed bookings with their actual durations
    pub async fn past_bookings(&self) -> DomainResult<Vec<Booking>> {
        let bookings = self.repository.list().await?;
        Ok(bookings
            .into_iter()
            .filter(|booking| booking.status == BookingStatus::Completed)
            .collect())
    }

    /// Stops every live sampler
    pub async fn shutdown(&self) {
        let trips: Vec<LiveTrip> = self.live.lock().await.drain().map(|(_, t)| t).collect();
        for trip in trips {
            trip.sampler.shutdown().await;
        }
    }

    fn spawn_sampler(&self, booking: &Booking) -> LiveTrip {
        let timer = booking.timer.clone();
        let clock = Arc::clone(&self.clock);
        let (tx, rx) = watch::channel(timer.sample_elapsed(clock.now()));

        let sampler = PeriodicTask::spawn(
            format!("trip-timer-{}", booking.id),
            Duration::from_millis(self.trip_config.sample_interval_millis),
            move || {
                let flow = match tx.send(timer.sample_elapsed(clock.now())) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(_) => ControlFlow::Break(()),
                };
                std::future::ready(flow)
            },
        );

        LiveTrip {
            sampler,
            elapsed: rx,
        }
    }
}

