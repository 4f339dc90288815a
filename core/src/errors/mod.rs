//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{
    BookingError, OtpError, StorageError, TripError, ValidationError, VerifyFailure, WalletError,
};

use loop_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Trip(#[from] TripError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<VerifyFailure> for DomainError {
    fn from(failure: VerifyFailure) -> Self {
        DomainError::Otp(OtpError::Verification(failure))
    }
}

impl DomainError {
    /// The verification failure behind this error, if it is one
    pub fn verify_failure(&self) -> Option<VerifyFailure> {
        match self {
            DomainError::Otp(err) => err.verify_failure(),
            _ => None,
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::NotFound { .. } => {
                ErrorResponse::new(error_codes::NOT_FOUND, self.to_string())
            }
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, self.to_string())
            }
            DomainError::Otp(err) => err.to_error_response(),
            DomainError::Trip(err) => err.to_error_response(),
            DomainError::Booking(err) => err.to_error_response(),
            DomainError::Wallet(err) => err.to_error_response(),
            DomainError::Storage(_) => {
                ErrorResponse::new(error_codes::STORAGE_ERROR, self.to_string())
            }
            DomainError::Validation(_) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, self.to_string())
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
