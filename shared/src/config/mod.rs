//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `environment` - Environment detection and logging configuration
//! - `handoff` - OTP handoff challenges and trip timing
//! - `storage` - Key-value storage backend selection
//! - `wallet` - Prepaid wallet limits and payment simulation

pub mod environment;
pub mod handoff;
pub mod storage;
pub mod wallet;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use handoff::{OtpConfig, TripConfig};
pub use storage::{StorageBackend, StorageConfig};
pub use wallet::WalletConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// OTP handoff configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Trip timer configuration
    #[serde(default)]
    pub trip: TripConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Key-value storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            otp: OtpConfig::default(),
            trip: TripConfig::default(),
            wallet: WalletConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self::default()
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            storage: StorageConfig {
                backend: StorageBackend::Redis,
                ..Default::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Default::default()
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            otp: OtpConfig::from_env(),
            trip: TripConfig::from_env(),
            wallet: WalletConfig::from_env(),
            storage: StorageConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Check values that would make the components unusable
    pub fn validate(&self) -> Result<(), String> {
        if self.otp.code_length == 0 {
            return Err("otp.code_length must be greater than zero".to_string());
        }
        if self.otp.window_seconds == 0 {
            return Err("otp.window_seconds must be greater than zero".to_string());
        }
        if self.otp.tick_millis == 0 {
            return Err("otp.tick_millis must be greater than zero".to_string());
        }
        if self.trip.sample_interval_millis == 0 {
            return Err("trip.sample_interval_millis must be greater than zero".to_string());
        }
        if self.wallet.minimum_recharge == 0 {
            return Err("wallet.minimum_recharge must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Read an environment variable, falling back to `default` when unset or unparsable
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_production_config() {
        let config = AppConfig::production();
        assert!(config.environment.is_production());
        assert_eq!(config.storage.backend, StorageBackend::Redis);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = AppConfig::default();
        config.otp.window_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("window_seconds"));
    }

    #[test]
    fn test_validate_rejects_zero_code_length() {
        let mut config = AppConfig::default();
        config.otp.code_length = 0;
        assert!(config.validate().is_err());
    }
}
