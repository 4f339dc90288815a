//! Wallet service types

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::entities::wallet::PaymentMethod;
use crate::errors::{DomainError, DomainResult, WalletError};

/// Storage key for the persisted balance
pub const BALANCE_KEY: &str = "walletBalance";

/// Storage key set once the first-run wallet prompt has been shown
pub const SEEN_WALLET_KEY: &str = "hasSeenWallet";

/// A recharge whose payment is still processing
///
/// Dropping the handle lets the payment finish in the background; call
/// `cancel` to stop it before the balance is credited.
#[derive(Debug)]
pub struct PendingRecharge {
    pub(super) id: Uuid,
    pub(super) amount: u64,
    pub(super) method: PaymentMethod,
    pub(super) handle: JoinHandle<DomainResult<u64>>,
}

impl PendingRecharge {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Stops the payment; the balance is not credited
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the payment and returns the new balance
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The recharge was credited
    /// * `Err(WalletError::RechargeCancelled)` - `cancel` was called first
    /// * `Err(DomainError)` - The balance could not be read or written
    pub async fn wait(self) -> DomainResult<u64> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(WalletError::RechargeCancelled.into()),
            Err(e) => Err(DomainError::Internal {
                message: format!("Recharge task failed: {}", e),
            }),
        }
    }
}
