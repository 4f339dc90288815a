//! Handoff session view types

use serde::{Deserialize, Serialize};

use crate::domain::entities::otp_challenge::{ChallengeState, OtpChallenge};

/// What the host renders for an open challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpView {
    /// Challenge state
    pub state: ChallengeState,
    /// Seconds left in the window
    pub remaining_seconds: u32,
    /// Countdown in `M:SS` form
    pub countdown_label: String,
    /// One entry per input box
    pub entered: Vec<Option<char>>,
    /// Whether the cancel action should be offered
    pub can_cancel: bool,
    /// Whether the resend action should be offered
    pub can_resend: bool,
}

impl From<&OtpChallenge> for OtpView {
    fn from(challenge: &OtpChallenge) -> Self {
        Self {
            state: challenge.state(),
            remaining_seconds: challenge.remaining_seconds(),
            countdown_label: challenge.format_remaining(),
            entered: challenge.entered_digits().to_vec(),
            can_cancel: challenge.can_cancel(),
            can_resend: challenge.state() == ChallengeState::Expired,
        }
    }
}
