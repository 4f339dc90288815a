//! Prepaid wallet entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::WalletError;

/// Smallest accepted recharge in rupees
pub const MINIMUM_RECHARGE: u64 = 200;

/// Balances below this are flagged as low
pub const LOW_BALANCE_THRESHOLD: u64 = 200;

/// Balance shown to a first-time user
pub const DEFAULT_BALANCE: u64 = 100;

/// One-tap recharge amounts
pub const QUICK_RECHARGE_AMOUNTS: [u64; 4] = [200, 500, 1000, 2000];

/// How a recharge is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Card,
    NetBanking,
}

impl PaymentMethod {
    /// Label shown on the payment picker
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::NetBanking => "Net Banking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Upi => write!(f, "upi"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::NetBanking => write!(f, "netbanking"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            "netbanking" | "net_banking" => Ok(PaymentMethod::NetBanking),
            _ => Err(WalletError::UnknownPaymentMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// Wallet balance in whole rupees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Parses a persisted balance string
    pub fn parse(value: &str) -> Result<Self, WalletError> {
        value
            .trim()
            .parse()
            .map(Self::new)
            .map_err(|_| WalletError::CorruptBalance {
                value: value.to_string(),
            })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Adds `amount`, saturating at `u64::MAX`, and returns the new balance
    pub fn credit(&mut self, amount: u64) -> u64 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }

    pub fn is_low(&self, threshold: u64) -> bool {
        self.balance < threshold
    }

    /// Checks a requested recharge against the minimum
    pub fn check_recharge(amount: u64, minimum: u64) -> Result<(), WalletError> {
        if amount < minimum {
            return Err(WalletError::RechargeTooSmall { amount, minimum });
        }
        Ok(())
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}
