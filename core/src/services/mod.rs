//! Business services containing domain logic and use cases.

pub mod clock;
pub mod handoff;
pub mod ticker;
pub mod trip;
pub mod wallet;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use handoff::{HandoffSession, OtpView};
pub use ticker::PeriodicTask;
pub use trip::TripService;
pub use wallet::{PendingRecharge, WalletService, BALANCE_KEY, SEEN_WALLET_KEY};
