//! Error types for handoff verification, trip timing, bookings and the wallet
//!
//! Every error maps to a stable code from `loop_shared::error_codes` so the
//! host can pick the right affordance (resend button, low balance banner, ...)
//! without parsing messages.

use loop_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a handoff code verification did not succeed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyFailure {
    #[error("Handoff code incomplete")]
    Incomplete,

    #[error("Handoff code does not match")]
    Mismatch,

    #[error("Handoff code expired")]
    Expired,

    #[error("Handoff code already verified")]
    AlreadyVerified,
}

/// OTP challenge and handoff session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Digit position {position} is outside 0..{length}")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("'{value}' is not a digit")]
    NotADigit { value: char },

    #[error("Resend is only allowed once the code has expired (state: {state})")]
    ResendNotAllowed { state: String },

    #[error("Cancel is only allowed while the code is pending (state: {state})")]
    CancelNotAllowed { state: String },

    #[error("Handoff session is closed")]
    SessionClosed,

    #[error(transparent)]
    Verification(#[from] VerifyFailure),
}

impl OtpError {
    /// The verification failure carried by this error, if any
    pub fn verify_failure(&self) -> Option<VerifyFailure> {
        match self {
            OtpError::Verification(failure) => Some(*failure),
            _ => None,
        }
    }
}

/// Trip timer errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripError {
    #[error("Trip timer is not active")]
    NotActive,

    #[error("Trip timer is already running")]
    AlreadyActive,

    #[error("Trip has already been completed")]
    AlreadyCompleted,
}

/// Booking lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Booking {id} not found")]
    NotFound { id: u64 },

    #[error("Booking {id} is {actual}, expected {expected}")]
    InvalidStatus {
        id: u64,
        expected: String,
        actual: String,
    },

    #[error("Booking {id} has no handoff code")]
    NoHandoffCode { id: u64 },
}

/// Wallet errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Recharge of {amount} is below the minimum of {minimum}")]
    RechargeTooSmall { amount: u64, minimum: u64 },

    #[error("Recharge was cancelled")]
    RechargeCancelled,

    #[error("Stored balance '{value}' is not a number")]
    CorruptBalance { value: String },

    #[error("Unknown payment method: {method}")]
    UnknownPaymentMethod { method: String },
}

/// Key-value storage errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend failure: {message}")]
    Backend { message: String },

    #[error("Stored value for '{key}' could not be decoded: {message}")]
    Serialization { key: String, message: String },
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid handoff code: {reason}")]
    InvalidCode { reason: String },

    #[error("Invalid countdown window: {seconds} seconds")]
    InvalidWindow { seconds: u32 },
}

impl IntoErrorResponse for VerifyFailure {
    fn to_error_response(&self) -> ErrorResponse {
        let code = match self {
            VerifyFailure::Incomplete => error_codes::OTP_INCOMPLETE,
            VerifyFailure::Mismatch => error_codes::OTP_MISMATCH,
            VerifyFailure::Expired => error_codes::OTP_EXPIRED,
            VerifyFailure::AlreadyVerified => error_codes::OTP_ALREADY_VERIFIED,
        };
        let response = ErrorResponse::new(code, self.to_string());
        if *self == VerifyFailure::Expired {
            response.add_detail("resend_allowed", true)
        } else {
            response
        }
    }
}

impl IntoErrorResponse for OtpError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            OtpError::Verification(failure) => failure.to_error_response(),
            OtpError::PositionOutOfRange { position, length } => {
                ErrorResponse::new(error_codes::OTP_INVALID_INPUT, self.to_string())
                    .add_detail("position", position)
                    .add_detail("length", length)
            }
            OtpError::NotADigit { .. } => {
                ErrorResponse::new(error_codes::OTP_INVALID_INPUT, self.to_string())
            }
            OtpError::ResendNotAllowed { .. } => {
                ErrorResponse::new(error_codes::OTP_RESEND_NOT_ALLOWED, self.to_string())
            }
            OtpError::CancelNotAllowed { .. } => {
                ErrorResponse::new(error_codes::OTP_CANCEL_NOT_ALLOWED, self.to_string())
            }
            OtpError::SessionClosed => {
                ErrorResponse::new(error_codes::OTP_SESSION_CLOSED, self.to_string())
            }
        }
    }
}

impl IntoErrorResponse for TripError {
    fn to_error_response(&self) -> ErrorResponse {
        let code = match self {
            TripError::NotActive => error_codes::TRIP_NOT_ACTIVE,
            TripError::AlreadyActive => error_codes::TRIP_ALREADY_ACTIVE,
            TripError::AlreadyCompleted => error_codes::TRIP_ALREADY_COMPLETED,
        };
        ErrorResponse::new(code, self.to_string())
    }
}

impl IntoErrorResponse for BookingError {
    fn to_error_response(&self) -> ErrorResponse {
        let code = match self {
            BookingError::NotFound { .. } => error_codes::NOT_FOUND,
            BookingError::InvalidStatus { .. } => error_codes::BOOKING_INVALID_STATUS,
            BookingError::NoHandoffCode { .. } => error_codes::BOOKING_NO_HANDOFF_CODE,
        };
        ErrorResponse::new(code, self.to_string())
    }
}

impl IntoErrorResponse for WalletError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            WalletError::RechargeTooSmall { minimum, .. } => {
                ErrorResponse::new(error_codes::WALLET_RECHARGE_TOO_SMALL, self.to_string())
                    .add_detail("minimum", minimum)
            }
            WalletError::RechargeCancelled => {
                ErrorResponse::new(error_codes::WALLET_RECHARGE_CANCELLED, self.to_string())
            }
            WalletError::CorruptBalance { .. } => {
                ErrorResponse::new(error_codes::WALLET_CORRUPT_BALANCE, self.to_string())
            }
            WalletError::UnknownPaymentMethod { .. } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, self.to_string())
            }
        }
    }
}
