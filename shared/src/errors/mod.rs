//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error payload handed to the host UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (remaining seconds, positions, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Stable error codes surfaced to hosts
pub mod error_codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";

    pub const OTP_INCOMPLETE: &str = "OTP_INCOMPLETE";
    pub const OTP_MISMATCH: &str = "OTP_MISMATCH";
    pub const OTP_EXPIRED: &str = "OTP_EXPIRED";
    pub const OTP_ALREADY_VERIFIED: &str = "OTP_ALREADY_VERIFIED";
    pub const OTP_INVALID_INPUT: &str = "OTP_INVALID_INPUT";
    pub const OTP_RESEND_NOT_ALLOWED: &str = "OTP_RESEND_NOT_ALLOWED";
    pub const OTP_CANCEL_NOT_ALLOWED: &str = "OTP_CANCEL_NOT_ALLOWED";
    pub const OTP_SESSION_CLOSED: &str = "OTP_SESSION_CLOSED";

    pub const TRIP_NOT_ACTIVE: &str = "TRIP_NOT_ACTIVE";
    pub const TRIP_ALREADY_ACTIVE: &str = "TRIP_ALREADY_ACTIVE";
    pub const TRIP_ALREADY_COMPLETED: &str = "TRIP_ALREADY_COMPLETED";
    pub const BOOKING_INVALID_STATUS: &str = "BOOKING_INVALID_STATUS";
    pub const BOOKING_NO_HANDOFF_CODE: &str = "BOOKING_NO_HANDOFF_CODE";

    pub const WALLET_RECHARGE_TOO_SMALL: &str = "WALLET_RECHARGE_TOO_SMALL";
    pub const WALLET_RECHARGE_CANCELLED: &str = "WALLET_RECHARGE_CANCELLED";
    pub const WALLET_CORRUPT_BALANCE: &str = "WALLET_CORRUPT_BALANCE";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_details() {
        let response = ErrorResponse::new(error_codes::OTP_EXPIRED, "Handoff code expired")
            .add_detail("remaining_seconds", 0)
            .add_detail("resend_allowed", true);

        assert_eq!(response.error, "OTP_EXPIRED");
        let details = response.details.unwrap();
        assert_eq!(details["remaining_seconds"], 0);
        assert_eq!(details["resend_allowed"], true);
    }

    #[test]
    fn test_details_skipped_when_empty() {
        let response = ErrorResponse::new(error_codes::NOT_FOUND, "missing");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
    }
}
