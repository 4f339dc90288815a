//! OTP challenge entity used to confirm a cycle handoff between lender and rider.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use loop_shared::utils::{format_countdown, is_code_digit, is_numeric_code, mask_code};

use crate::errors::{OtpError, ValidationError, VerifyFailure};

/// Default length of a handoff code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default countdown window for a challenge (5 minutes)
pub const DEFAULT_WINDOW_SECONDS: u32 = 300;

/// Lifecycle state of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeState {
    /// Waiting for the rider to enter the code
    Pending,
    /// The countdown reached zero before a successful verify
    Expired,
    /// The entered code matched
    Verified,
}

impl ChallengeState {
    /// `Expired` and `Verified` only change through an explicit resend
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChallengeState::Pending)
    }
}

impl fmt::Display for ChallengeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeState::Pending => write!(f, "pending"),
            ChallengeState::Expired => write!(f, "expired"),
            ChallengeState::Verified => write!(f, "verified"),
        }
    }
}

/// What a single countdown tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still pending with this many seconds left
    Counting { remaining: u32 },
    /// This tick closed the window
    Expired,
    /// The challenge was not pending; nothing changed
    Idle,
}

/// One handoff verification attempt bound to one code and one countdown window
#[derive(Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    id: Uuid,
    expected_code: String,
    entered: Vec<Option<char>>,
    remaining_seconds: u32,
    window_seconds: u32,
    state: ChallengeState,
    resend_count: u32,
    created_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Creates a pending challenge with the default 300 second window
    ///
    /// # Arguments
    ///
    /// * `expected_code` - The code shared by the lender; ASCII digits only
    ///
    /// # Returns
    ///
    /// The new challenge, or a `ValidationError` if the code is empty or not numeric
    pub fn new(expected_code: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_window(expected_code, DEFAULT_WINDOW_SECONDS)
    }

    /// Creates a pending challenge with a custom countdown window
    ///
    /// # Arguments
    ///
    /// * `expected_code` - The code shared by the lender; ASCII digits only
    /// * `window_seconds` - Seconds until the challenge expires; must be positive
    pub fn with_window(
        expected_code: impl Into<String>,
        window_seconds: u32,
    ) -> Result<Self, ValidationError> {
        let expected_code = expected_code.into();

        if expected_code.is_empty() {
            return Err(ValidationError::InvalidCode {
                reason: "code is empty".to_string(),
            });
        }
        if !is_numeric_code(&expected_code) {
            return Err(ValidationError::InvalidCode {
                reason: "code must contain digits only".to_string(),
            });
        }
        if window_seconds == 0 {
            return Err(ValidationError::InvalidWindow {
                seconds: window_seconds,
            });
        }

        let length = expected_code.len();
        Ok(Self {
            id: Uuid::new_v4(),
            expected_code,
            entered: vec![None; length],
            remaining_seconds: window_seconds,
            window_seconds,
            state: ChallengeState::Pending,
            resend_count: 0,
            created_at: Utc::now(),
        })
    }

    /// Generates a random numeric handoff code of the given length
    pub fn generate_code(length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Resets to a fresh pending challenge: full window, same code, no digits
    pub fn reinitialize(&mut self) {
        self.state = ChallengeState::Pending;
        self.remaining_seconds = self.window_seconds;
        self.clear_digits();
    }

    /// Advances the countdown by one second
    ///
    /// Only a pending challenge counts down. The tick that reaches zero moves
    /// the challenge to `Expired` and reports `TickOutcome::Expired`; every
    /// later tick is a no-op.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != ChallengeState::Pending {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = ChallengeState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting {
                remaining: self.remaining_seconds,
            }
        }
    }

    /// Writes a single digit into a slot, replacing whatever was there
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The digit was stored
    /// * `Ok(false)` - The challenge is not pending; nothing changed
    /// * `Err(OtpError)` - The position is out of range or the value is not a digit
    pub fn input_digit(&mut self, position: usize, value: char) -> Result<bool, OtpError> {
        if self.state != ChallengeState::Pending {
            return Ok(false);
        }
        self.check_position(position)?;
        if !is_code_digit(value) {
            return Err(OtpError::NotADigit { value });
        }

        self.entered[position] = Some(value);
        Ok(true)
    }

    /// Empties a single slot
    pub fn clear_digit(&mut self, position: usize) -> Result<bool, OtpError> {
        if self.state != ChallengeState::Pending {
            return Ok(false);
        }
        self.check_position(position)?;

        self.entered[position] = None;
        Ok(true)
    }

    /// Replaces all entered digits with `code`, starting at position 0.
    ///
    /// The whole input is validated before any slot is written.
    pub fn input_code(&mut self, code: &str) -> Result<bool, OtpError> {
        if self.state != ChallengeState::Pending {
            return Ok(false);
        }

        let digits: Vec<char> = code.chars().collect();
        if digits.len() > self.code_length() {
            return Err(OtpError::PositionOutOfRange {
                position: digits.len() - 1,
                length: self.code_length(),
            });
        }
        if let Some(bad) = digits.iter().find(|c| !is_code_digit(**c)) {
            return Err(OtpError::NotADigit { value: *bad });
        }

        self.clear_digits();
        for (slot, digit) in self.entered.iter_mut().zip(digits) {
            *slot = Some(digit);
        }
        Ok(true)
    }

    /// Empties every slot
    pub fn clear_digits(&mut self) {
        self.entered.iter_mut().for_each(|slot| *slot = None);
    }

    /// Compares the entered digits with the expected code
    ///
    /// Succeeds only while pending with every slot filled and an exact match;
    /// the challenge then becomes `Verified`. Failures leave the state as it
    /// was, except that a pending challenge whose window has already closed is
    /// moved to `Expired`.
    pub fn verify(&mut self) -> Result<(), VerifyFailure> {
        match self.state {
            ChallengeState::Verified => return Err(VerifyFailure::AlreadyVerified),
            ChallengeState::Expired => return Err(VerifyFailure::Expired),
            ChallengeState::Pending => {}
        }

        if self.remaining_seconds == 0 {
            self.state = ChallengeState::Expired;
            return Err(VerifyFailure::Expired);
        }

        if !self.is_complete() {
            return Err(VerifyFailure::Incomplete);
        }

        let entered = self.entered_code();
        if !constant_time_eq(entered.as_bytes(), self.expected_code.as_bytes()) {
            return Err(VerifyFailure::Mismatch);
        }

        self.state = ChallengeState::Verified;
        Ok(())
    }

    /// Restarts an expired challenge with the same code and a full window
    pub fn resend(&mut self) -> Result<(), OtpError> {
        if self.state != ChallengeState::Expired {
            return Err(OtpError::ResendNotAllowed {
                state: self.state.to_string(),
            });
        }

        self.reinitialize();
        self.resend_count += 1;
        Ok(())
    }

    /// Whether the challenge may still be cancelled by the rider
    pub fn can_cancel(&self) -> bool {
        self.state == ChallengeState::Pending
    }

    /// The entered digits concatenated, skipping empty slots
    pub fn entered_code(&self) -> String {
        self.entered.iter().flatten().collect()
    }

    /// Every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.entered.iter().all(Option::is_some)
    }

    /// Countdown label in `M:SS` form
    pub fn format_remaining(&self) -> String {
        format_countdown(self.remaining_seconds)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn window_seconds(&self) -> u32 {
        self.window_seconds
    }

    pub fn code_length(&self) -> usize {
        self.entered.len()
    }

    pub fn entered_digits(&self) -> &[Option<char>] {
        &self.entered
    }

    pub fn resend_count(&self) -> u32 {
        self.resend_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn check_position(&self, position: usize) -> Result<(), OtpError> {
        if position >= self.code_length() {
            return Err(OtpError::PositionOutOfRange {
                position,
                length: self.code_length(),
            });
        }
        Ok(())
    }
}

// Keep the expected code out of logs.
impl fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("id", &self.id)
            .field("expected_code", &mask_code(&self.expected_code))
            .field("entered", &self.entered_code().len())
            .field("remaining_seconds", &self.remaining_seconds)
            .field("window_seconds", &self.window_seconds)
            .field("state", &self.state)
            .field("resend_count", &self.resend_count)
            .finish()
    }
}
