//! Unit tests for domain error types

use loop_shared::errors::IntoErrorResponse;

use crate::errors::{
    BookingError, DomainError, OtpError, TripError, VerifyFailure, WalletError,
};

#[test]
fn test_verify_failure_codes() {
    assert_eq!(VerifyFailure::Incomplete.to_error_response().error, "OTP_INCOMPLETE");
    assert_eq!(VerifyFailure::Mismatch.to_error_response().error, "OTP_MISMATCH");
    assert_eq!(
        VerifyFailure::AlreadyVerified.to_error_response().error,
        "OTP_ALREADY_VERIFIED"
    );
}

#[test]
fn test_expired_offers_resend() {
    let response = VerifyFailure::Expired.to_error_response();
    assert_eq!(response.error, "OTP_EXPIRED");
    assert_eq!(response.details.unwrap()["resend_allowed"], true);
}

#[test]
fn test_verify_failure_through_domain_error() {
    let err: DomainError = VerifyFailure::Mismatch.into();
    assert_eq!(err.verify_failure(), Some(VerifyFailure::Mismatch));
    assert_eq!(err.to_error_response().error, "OTP_MISMATCH");

    let other: DomainError = TripError::NotActive.into();
    assert_eq!(other.verify_failure(), None);
}

#[test]
fn test_position_out_of_range_details() {
    let err = OtpError::PositionOutOfRange {
        position: 7,
        length: 6,
    };
    let response = err.to_error_response();
    assert_eq!(response.error, "OTP_INVALID_INPUT");
    let details = response.details.unwrap();
    assert_eq!(details["position"], 7);
    assert_eq!(details["length"], 6);
}

#[test]
fn test_trip_error_codes() {
    let err: DomainError = TripError::NotActive.into();
    assert_eq!(err.to_error_response().error, "TRIP_NOT_ACTIVE");
    assert_eq!(err.to_string(), "Trip timer is not active");
}

#[test]
fn test_booking_and_wallet_messages() {
    let err = BookingError::InvalidStatus {
        id: 4,
        expected: "current".to_string(),
        actual: "completed".to_string(),
    };
    assert_eq!(err.to_string(), "Booking 4 is completed, expected current");

    let err = WalletError::RechargeTooSmall {
        amount: 150,
        minimum: 200,
    };
    let response = err.to_error_response();
    assert_eq!(response.error, "WALLET_RECHARGE_TOO_SMALL");
    assert_eq!(response.details.unwrap()["minimum"], 200);
}

#[test]
fn test_cancel_and_resend_have_distinct_codes() {
    let resend = OtpError::ResendNotAllowed {
        state: "pending".to_string(),
    };
    let cancel = OtpError::CancelNotAllowed {
        state: "expired".to_string(),
    };
    assert_eq!(resend.to_error_response().error, "OTP_RESEND_NOT_ALLOWED");
    assert_eq!(cancel.to_error_response().error, "OTP_CANCEL_NOT_ALLOWED");
}
