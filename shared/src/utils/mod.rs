//! Common utility functions

pub mod time_format;
pub mod validation;

// Re-export commonly used utilities
pub use time_format::*;
pub use validation::*;
