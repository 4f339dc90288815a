//! Wallet service module

mod service;
mod types;

#[cfg(test)]
mod tests;

pub use service::WalletService;
pub use types::{PendingRecharge, BALANCE_KEY, SEEN_WALLET_KEY};
