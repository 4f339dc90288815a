//! Wallet configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Prepaid wallet configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
    /// Balance shown before anything has been persisted
    #[serde(default = "default_balance")]
    pub default_balance: u64,

    /// Smallest accepted recharge
    #[serde(default = "default_minimum_recharge")]
    pub minimum_recharge: u64,

    /// Balances below this prompt the user to recharge
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: u64,

    /// Simulated payment processing latency in milliseconds
    #[serde(default = "default_processing_delay_millis")]
    pub processing_delay_millis: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            default_balance: default_balance(),
            minimum_recharge: default_minimum_recharge(),
            low_balance_threshold: default_low_balance_threshold(),
            processing_delay_millis: default_processing_delay_millis(),
        }
    }
}

impl WalletConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            default_balance: env_or("LOOP_WALLET_DEFAULT_BALANCE", default_balance()),
            minimum_recharge: env_or("LOOP_WALLET_MINIMUM_RECHARGE", default_minimum_recharge()),
            low_balance_threshold: env_or(
                "LOOP_WALLET_LOW_BALANCE_THRESHOLD",
                default_low_balance_threshold(),
            ),
            processing_delay_millis: env_or(
                "LOOP_WALLET_PROCESSING_DELAY_MILLIS",
                default_processing_delay_millis(),
            ),
        }
    }

    /// Set the simulated processing delay
    pub fn with_processing_delay_millis(mut self, millis: u64) -> Self {
        self.processing_delay_millis = millis;
        self
    }
}

fn default_balance() -> u64 {
    100
}

fn default_minimum_recharge() -> u64 {
    200
}

fn default_low_balance_threshold() -> u64 {
    200
}

fn default_processing_delay_millis() -> u64 {
    2000
}
