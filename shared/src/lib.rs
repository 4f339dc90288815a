//! Shared utilities and common types for the LOOP rental core
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types
//! - Error codes and response structures
//! - Utility functions (duration labels, code validation)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, LogFormat, LoggingConfig, OtpConfig, StorageBackend, StorageConfig,
    TripConfig, WalletConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use utils::{time_format, validation};
