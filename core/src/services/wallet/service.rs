//! Wallet service: persisted balance and simulated recharges.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use loop_shared::config::WalletConfig;

use crate::domain::entities::wallet::{PaymentMethod, Wallet, QUICK_RECHARGE_AMOUNTS};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::KeyValueStore;

use super::types::{PendingRecharge, BALANCE_KEY, SEEN_WALLET_KEY};

/// Wallet operations over a key-value store
pub struct WalletService<S: KeyValueStore + 'static> {
    store: Arc<S>,
    config: WalletConfig,
    /// Serialises read-modify-write of the balance
    write_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore + 'static> WalletService<S> {
    /// Create a new wallet service
    pub fn new(store: Arc<S>, config: WalletConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current balance, or the configured default when none is stored
    pub async fn balance(&self) -> DomainResult<u64> {
        read_balance(self.store.as_ref(), self.config.default_balance).await
    }

    /// Overwrites the stored balance
    pub async fn set_balance(&self, amount: u64) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.set(BALANCE_KEY, &amount.to_string()).await?;
        info!(event = "wallet_balance_set", balance = amount, "Wallet balance updated");
        Ok(())
    }

    /// Balance is under the low-balance threshold
    pub async fn is_low_balance(&self) -> DomainResult<bool> {
        let balance = self.balance().await?;
        Ok(Wallet::new(balance).is_low(self.config.low_balance_threshold))
    }

    /// Whether a booking at this hourly price can be made (two hours up front)
    pub async fn can_afford(&self, price_per_hour: u64) -> DomainResult<bool> {
        let balance = self.balance().await?;
        Ok(balance >= price_per_hour.saturating_mul(2))
    }

    /// First-run recharge prompt
    ///
    /// Returns `true` at most once: when the wallet has never been seen and
    /// the balance is low. The seen flag is recorded when the prompt fires.
    pub async fn should_prompt_recharge(&self) -> DomainResult<bool> {
        let _guard = self.write_lock.lock().await;
        if self.store.get(SEEN_WALLET_KEY).await?.is_some() {
            return Ok(false);
        }
        if !self.is_low_balance().await? {
            return Ok(false);
        }

        self.store.set(SEEN_WALLET_KEY, "true").await?;
        info!(event = "wallet_prompt_shown", "First-run recharge prompt shown");
        Ok(true)
    }

    /// One-tap recharge amounts
    pub fn quick_amounts(&self) -> &'static [u64] {
        &QUICK_RECHARGE_AMOUNTS
    }

    pub fn minimum_recharge(&self) -> u64 {
        self.config.minimum_recharge
    }

    /// Starts a recharge
    ///
    /// The amount is checked immediately; the payment then completes after
    /// the configured processing delay, crediting the stored balance.
    ///
    /// # Returns
    ///
    /// * `Ok(PendingRecharge)` - Payment is processing
    /// * `Err(WalletError::RechargeTooSmall)` - Below the minimum recharge
    pub fn recharge(&self, amount: u64, method: PaymentMethod) -> DomainResult<PendingRecharge> {
        if let Err(e) = Wallet::check_recharge(amount, self.config.minimum_recharge) {
            warn!(
                event = "wallet_recharge_rejected",
                amount,
                minimum = self.config.minimum_recharge,
                "Recharge below minimum"
            );
            return Err(e.into());
        }

        let id = Uuid::new_v4();
        let store = Arc::clone(&self.store);
        let write_lock = Arc::clone(&self.write_lock);
        let delay = Duration::from_millis(self.config.processing_delay_millis);
        let default_balance = self.config.default_balance;

        info!(
            event = "wallet_recharge_started",
            recharge_id = %id,
            amount,
            method = %method,
            "Processing recharge"
        );

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let _guard = write_lock.lock().await;
            let balance = credit_balance(store.as_ref(), amount, default_balance).await?;
            info!(
                event = "wallet_recharged",
                recharge_id = %id,
                amount,
                method = %method,
                balance,
                "Recharge credited"
            );
            Ok::<_, DomainError>(balance)
        });

        Ok(PendingRecharge {
            id,
            amount,
            method,
            handle,
        })
    }
}

async fn read_balance<S: KeyValueStore + ?Sized>(store: &S, default: u64) -> DomainResult<u64> {
    match store.get(BALANCE_KEY).await? {
        Some(value) => Ok(Wallet::parse(&value)?.balance()),
        None => Ok(default),
    }
}

async fn credit_balance<S: KeyValueStore + ?Sized>(
    store: &S,
    amount: u64,
    default: u64,
) -> DomainResult<u64> {
    let mut wallet = Wallet::new(read_balance(store, default).await?);
    let balance = wallet.credit(amount);
    store.set(BALANCE_KEY, &balance.to_string()).await?;
    Ok(balance)
}
