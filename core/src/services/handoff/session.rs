//! Handoff session: an OTP challenge plus the countdown that drives it.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use loop_shared::config::OtpConfig;
use loop_shared::utils::is_valid_code;

use crate::domain::entities::booking::BookingId;
use crate::domain::entities::otp_challenge::{ChallengeState, OtpChallenge, TickOutcome};
use crate::domain::events::TripEvent;
use crate::errors::{DomainResult, OtpError, ValidationError, VerifyFailure};
use crate::services::clock::Clock;
use crate::services::ticker::PeriodicTask;

use super::types::OtpView;

type SharedChallenge = Arc<Mutex<Option<OtpChallenge>>>;

/// A live handoff verification for one booking
///
/// The challenge is shared with the countdown task behind a single mutex, so
/// a tick and a verify never interleave. The challenge is discarded on
/// successful verification and on cancel; after that every operation reports
/// `OtpError::SessionClosed`. Dropping the session stops the countdown.
pub struct HandoffSession {
    booking_id: BookingId,
    challenge: SharedChallenge,
    ticker: Option<PeriodicTask>,
    config: OtpConfig,
    clock: Arc<dyn Clock>,
}

impl HandoffSession {
    /// Opens a session and starts its countdown
    ///
    /// # Arguments
    ///
    /// * `booking_id` - Booking being handed over
    /// * `expected_code` - Code the rider must enter
    /// * `config` - Code length, window and tick period
    /// * `clock` - Stamps the trip start on success
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        booking_id: BookingId,
        expected_code: &str,
        config: OtpConfig,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        if !is_valid_code(expected_code, config.code_length) {
            return Err(ValidationError::InvalidCode {
                reason: format!("expected a {}-digit numeric code", config.code_length),
            }
            .into());
        }

        let challenge = OtpChallenge::with_window(expected_code, config.window_seconds)?;
        info!(
            event = "otp_challenge_opened",
            booking_id,
            challenge_id = %challenge.id(),
            window_seconds = challenge.window_seconds(),
            "Handoff challenge opened"
        );

        let challenge = Arc::new(Mutex::new(Some(challenge)));
        let ticker = spawn_countdown(booking_id, Arc::clone(&challenge), &config);

        Ok(Self {
            booking_id,
            challenge,
            ticker: Some(ticker),
            config,
            clock,
        })
    }

    pub fn booking_id(&self) -> BookingId {
        self.booking_id
    }

    /// Writes one digit; see `OtpChallenge::input_digit`
    pub async fn input_digit(&self, position: usize, value: char) -> Result<bool, OtpError> {
        let mut guard = self.challenge.lock().await;
        let challenge = guard.as_mut().ok_or(OtpError::SessionClosed)?;
        challenge.input_digit(position, value)
    }

    pub async fn clear_digit(&self, position: usize) -> Result<bool, OtpError> {
        let mut guard = self.challenge.lock().await;
        let challenge = guard.as_mut().ok_or(OtpError::SessionClosed)?;
        challenge.clear_digit(position)
    }

    /// Pastes a whole code into the input boxes
    pub async fn input_code(&self, code: &str) -> Result<bool, OtpError> {
        let mut guard = self.challenge.lock().await;
        let challenge = guard.as_mut().ok_or(OtpError::SessionClosed)?;
        challenge.input_code(code)
    }

    /// Checks the entered code
    ///
    /// On success the challenge is discarded, the countdown stops and the
    /// returned event carries the instant the trip should start at.
    pub async fn verify(&mut self) -> Result<TripEvent, OtpError> {
        let event = self.confirm().await?;
        self.close().await;
        Ok(event)
    }

    /// Checks the entered code but keeps the session open
    ///
    /// A verified challenge stays in place until `close`; calling this again
    /// hands out a new start event stamped with the current time.
    pub(crate) async fn confirm(&mut self) -> Result<TripEvent, OtpError> {
        let mut guard = self.challenge.lock().await;
        let challenge = guard.as_mut().ok_or(OtpError::SessionClosed)?;

        if challenge.state() == ChallengeState::Verified {
            return Ok(self.started(challenge.id()));
        }

        match challenge.verify() {
            Ok(()) => {
                let event = self.started(challenge.id());
                info!(
                    event = "otp_verified",
                    booking_id = self.booking_id,
                    challenge_id = %challenge.id(),
                    remaining_seconds = challenge.remaining_seconds(),
                    "Handoff code verified"
                );

                drop(guard);
                self.stop_countdown();
                Ok(event)
            }
            Err(failure) => {
                if failure == VerifyFailure::Mismatch && self.config.clear_on_mismatch {
                    challenge.clear_digits();
                }
                warn!(
                    event = "otp_verify_failed",
                    booking_id = self.booking_id,
                    challenge_id = %challenge.id(),
                    reason = %failure,
                    "Handoff code rejected"
                );
                Err(failure.into())
            }
        }
    }

    /// Discards the challenge and stops the countdown
    pub(crate) async fn close(&mut self) {
        *self.challenge.lock().await = None;
        self.stop_countdown();
    }

    /// Restarts an expired challenge with a full window and a fresh countdown
    pub async fn resend(&mut self) -> Result<(), OtpError> {
        let mut guard = self.challenge.lock().await;
        let challenge = guard.as_mut().ok_or(OtpError::SessionClosed)?;
        challenge.resend()?;

        info!(
            event = "otp_resent",
            booking_id = self.booking_id,
            challenge_id = %challenge.id(),
            resend_count = challenge.resend_count(),
            "Handoff code window restarted"
        );
        drop(guard);

        self.stop_countdown();
        self.ticker = Some(spawn_countdown(
            self.booking_id,
            Arc::clone(&self.challenge),
            &self.config,
        ));
        Ok(())
    }

    /// Abandons a pending challenge
    pub async fn cancel(&mut self) -> Result<(), OtpError> {
        let mut guard = self.challenge.lock().await;
        let challenge = guard.as_ref().ok_or(OtpError::SessionClosed)?;
        if !challenge.can_cancel() {
            return Err(OtpError::CancelNotAllowed {
                state: challenge.state().to_string(),
            });
        }

        info!(
            event = "otp_cancelled",
            booking_id = self.booking_id,
            challenge_id = %challenge.id(),
            "Handoff cancelled"
        );
        *guard = None;
        drop(guard);

        self.stop_countdown();
        Ok(())
    }

    /// Current view, or `None` once the session is closed
    pub async fn snapshot(&self) -> Option<OtpView> {
        self.challenge.lock().await.as_ref().map(OtpView::from)
    }

    /// The challenge has been verified or cancelled
    pub async fn is_closed(&self) -> bool {
        self.challenge.lock().await.is_none()
    }

    pub fn countdown_running(&self) -> bool {
        self.ticker
            .as_ref()
            .map_or(false, |ticker| !ticker.is_finished())
    }

    fn started(&self, challenge_id: Uuid) -> TripEvent {
        TripEvent::Started {
            booking_id: self.booking_id,
            challenge_id,
            at: self.clock.now(),
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

fn spawn_countdown(
    booking_id: BookingId,
    shared: SharedChallenge,
    config: &OtpConfig,
) -> PeriodicTask {
    PeriodicTask::spawn(
        format!("otp-countdown-{}", booking_id),
        Duration::from_millis(config.tick_millis),
        move || {
            let shared = Arc::clone(&shared);
            async move {
                let mut guard = shared.lock().await;
                let Some(challenge) = guard.as_mut() else {
                    return ControlFlow::Break(());
                };

                match challenge.tick() {
                    TickOutcome::Counting { .. } => ControlFlow::Continue(()),
                    TickOutcome::Expired => {
                        info!(
                            event = "otp_expired",
                            booking_id,
                            challenge_id = %challenge.id(),
                            "Handoff code expired"
                        );
                        ControlFlow::Break(())
                    }
                    TickOutcome::Idle => ControlFlow::Break(()),
                }
            }
        },
    )
}
