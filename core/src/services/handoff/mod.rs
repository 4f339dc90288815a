//! Handoff verification sessions
//!
//! A session wraps one `OtpChallenge` with the periodic countdown that
//! expires it, and turns a successful verify into a `TripEvent::Started`.

mod session;
mod types;


pub use session::HandoffSession;
pub use types::OtpView;
