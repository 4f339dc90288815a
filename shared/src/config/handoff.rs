//! Handoff verification and trip timing configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// OTP challenge configuration used when a cycle is handed over
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in a handoff code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds a challenge stays open before it expires
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u32,

    /// Countdown tick period in milliseconds
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Clear the entered digits after a mismatched verify
    #[serde(default)]
    pub clear_on_mismatch: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            window_seconds: default_window_seconds(),
            tick_millis: default_tick_millis(),
            clear_on_mismatch: false,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            code_length: env_or("LOOP_OTP_CODE_LENGTH", default_code_length()),
            window_seconds: env_or("LOOP_OTP_WINDOW_SECONDS", default_window_seconds()),
            tick_millis: env_or("LOOP_OTP_TICK_MILLIS", default_tick_millis()),
            clear_on_mismatch: env_or("LOOP_OTP_CLEAR_ON_MISMATCH", false),
        }
    }

    /// Set the expiry window in seconds
    pub fn with_window_seconds(mut self, seconds: u32) -> Self {
        self.window_seconds = seconds;
        self
    }

    /// Set the tick period in milliseconds
    pub fn with_tick_millis(mut self, millis: u64) -> Self {
        self.tick_millis = millis;
        self
    }
}

/// Trip timer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TripConfig {
    /// How often the live elapsed time is re-sampled, in milliseconds
    #[serde(default = "default_sample_interval_millis")]
    pub sample_interval_millis: u64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            sample_interval_millis: default_sample_interval_millis(),
        }
    }
}

impl TripConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            sample_interval_millis: env_or(
                "LOOP_TRIP_SAMPLE_INTERVAL_MILLIS",
                default_sample_interval_millis(),
            ),
        }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_window_seconds() -> u32 {
    300 // 5 minutes
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_sample_interval_millis() -> u64 {
    1000
}
