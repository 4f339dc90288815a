//! # LOOP Core
//!
//! Core domain layer for the LOOP campus cycle-rental backend.
//! This crate contains the handoff OTP challenge, the trip timer, bookings and
//! the wallet, together with the services that drive them, repository
//! interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Booking, BookingId, BookingStatus, ChallengeState, OtpChallenge, PaymentMethod, TickOutcome,
    TripTimer, Wallet,
};
pub use domain::events::TripEvent;
pub use errors::*;
pub use repositories::{BookingRepository, KeyValueStore};
pub use services::{
    Clock, HandoffSession, ManualClock, OtpView, PendingRecharge, PeriodicTask, SystemClock,
    TripService, WalletService,
};
