//! Domain entities representing core business objects.

pub mod booking;
pub mod otp_challenge;
pub mod trip_timer;
pub mod wallet;


// Re-export commonly used types
pub use booking::{Booking, BookingId, BookingStatus};
pub use otp_challenge::{
    ChallengeState, OtpChallenge, TickOutcome, DEFAULT_CODE_LENGTH, DEFAULT_WINDOW_SECONDS,
};
pub use trip_timer::TripTimer;
pub use wallet::{
    PaymentMethod, Wallet, DEFAULT_BALANCE, LOW_BALANCE_THRESHOLD, MINIMUM_RECHARGE,
    QUICK_RECHARGE_AMOUNTS,
};
