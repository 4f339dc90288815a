//! # Infrastructure Layer
//!
//! Concrete implementations behind the LOOP core's repository traits, plus
//! process setup.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Storage**: key-value stores (in-memory, JSON file, Redis)
//! - **Repositories**: booking persistence on top of any key-value store
//! - **Config**: `.env` loading and validation of `AppConfig`
//! - **Telemetry**: `tracing-subscriber` initialisation
//!
//! ## Features
//!
//! - `redis-store`: Enable the Redis key-value store (default)

// Re-export core types for convenience
pub use loop_core::errors::*;

/// Configuration loading
pub mod config;

/// Booking persistence
pub mod repositories;

/// Service container wiring stores, repositories and services together
pub mod services;

/// Key-value store backends
pub mod storage;

/// Tracing subscriber setup
pub mod telemetry;

pub use config::load_config;
pub use repositories::KvBookingRepository;
pub use services::{initialize, LoopServices};
pub use storage::{open_store, ConfiguredStore, FileStore, MemoryStore};
#[cfg(feature = "redis-store")]
pub use storage::RedisStore;
pub use telemetry::init_tracing;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis store error
    #[cfg(feature = "redis-store")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Storage(StorageError::Backend {
            message: err.to_string(),
        })
    }
}
