//! Tests for the trip service

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::time::sleep;

use loop_shared::config::{OtpConfig, TripConfig};

use crate::domain::entities::booking::{Booking, BookingStatus};
use crate::domain::entities::otp_challenge::ChallengeState;
use crate::domain::events::TripEvent;
use crate::errors::{BookingError, DomainError, TripError, VerifyFailure};
use crate::repositories::MockBookingRepository;
use crate::services::clock::{Clock, ManualClock};
use crate::services::trip::TripService;

struct Fixture {
    service: TripService<MockBookingRepository, ManualClock>,
    repo: Arc<MockBookingRepository>,
    clock: Arc<ManualClock>,
}

fn fixture() -> Fixture {
    let repo = Arc::new(MockBookingRepository::with_bookings([
        Booking::new(1, "Campus Cruiser", "Arjun", "Hostel Block A", 25).with_handoff_code("123456"),
        Booking::new(2, "Trail Blazer", "Meera", "Library", 30),
    ]));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
    ));
    let service = TripService::new(
        Arc::clone(&repo),
        Arc::clone(&clock),
        OtpConfig::default(),
        TripConfig::default(),
    );
    Fixture {
        service,
        repo,
        clock,
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_trip() {
    let f = fixture();
    let started_at = f.clock.now();

    let mut session = f.service.begin_handoff(1).await.unwrap();
    session.input_code("123456").await.unwrap();

    let started = f.service.confirm_handoff(&mut session).await.unwrap();
    assert!(matches!(started, TripEvent::Started { booking_id: 1, .. }));
    assert_eq!(started.at(), started_at);

    let booking = f.repo.get(1).unwrap();
    assert_eq!(booking.status, BookingStatus::Active);
    assert_eq!(booking.timer.start_instant(), Some(started_at));

    f.clock.advance(chrono::Duration::seconds(3695));
    assert_eq!(f.service.elapsed(1).await.unwrap(), 3695);

    let ended = f.service.end_trip(1).await.unwrap();
    match ended {
        TripEvent::Ended {
            booking_id,
            duration,
            seconds,
            ..
        } => {
            assert_eq!(booking_id, 1);
            assert_eq!(duration, "01:01:35");
            assert_eq!(seconds, 3695);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let booking = f.repo.get(1).unwrap();
    assert_eq!(booking.status, BookingStatus::Completed);
    assert_eq!(booking.actual_duration(), Some("01:01:35"));
    assert_eq!(f.service.elapsed(1).await.unwrap(), 0);
    assert!(f.service.live_elapsed(1).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_live_elapsed_updates() {
    let f = fixture();
    let mut session = f.service.begin_handoff(1).await.unwrap();
    session.input_code("123456").await.unwrap();
    f.service.confirm_handoff(&mut session).await.unwrap();

    let rx = f.service.live_elapsed(1).await.unwrap();
    assert_eq!(*rx.borrow(), 0);

    f.clock.advance(chrono::Duration::seconds(75));
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(*rx.borrow(), 75);

    f.service.end_trip(1).await.unwrap();
    f.clock.advance(chrono::Duration::seconds(100));
    sleep(Duration::from_millis(3_000)).await;
    assert_eq!(*rx.borrow(), 75);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_code_does_not_start_trip() {
    let f = fixture();
    let mut session = f.service.begin_handoff(1).await.unwrap();
    session.input_code("000000").await.unwrap();

    let err = f.service.confirm_handoff(&mut session).await.unwrap_err();
    assert_eq!(err.verify_failure(), Some(VerifyFailure::Mismatch));
    assert_eq!(f.repo.get(1).unwrap().status, BookingStatus::Current);
    assert!(f.service.live_elapsed(1).await.is_none());

    // The same session can still succeed
    session.input_code("123456").await.unwrap();
    assert!(f.service.confirm_handoff(&mut session).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_failed_start_keeps_session_open() {
    let f = fixture();
    let mut session = f.service.begin_handoff(1).await.unwrap();
    session.input_code("123456").await.unwrap();

    f.repo.set_should_fail(true);
    assert!(matches!(
        f.service.confirm_handoff(&mut session).await,
        Err(DomainError::Internal { .. })
    ));
    f.repo.set_should_fail(false);

    assert!(!session.is_closed().await);
    assert_eq!(f.repo.get(1).unwrap().status, BookingStatus::Current);

    let started = f.service.confirm_handoff(&mut session).await.unwrap();
    assert_eq!(started.booking_id(), 1);
    assert!(session.is_closed().await);
    assert_eq!(f.repo.get(1).unwrap().status, BookingStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn test_confirm_rejects_booking_already_started() {
    let f = fixture();
    let mut session = f.service.begin_handoff(1).await.unwrap();
    session.input_code("123456").await.unwrap();
    f.service.start_trip(1, f.clock.now()).await.unwrap();

    assert!(matches!(
        f.service.confirm_handoff(&mut session).await,
        Err(DomainError::Booking(BookingError::InvalidStatus { .. }))
    ));

    // The code was never checked
    let view = session.snapshot().await.unwrap();
    assert_eq!(view.state, ChallengeState::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_expired_handoff_does_not_start_trip() {
    let f = fixture();
    let mut session = f.service.begin_handoff(1).await.unwrap();
    session.input_code("123456").await.unwrap();

    sleep(Duration::from_millis(300_500)).await;

    let err = f.service.confirm_handoff(&mut session).await.unwrap_err();
    assert_eq!(err.verify_failure(), Some(VerifyFailure::Expired));
    assert_eq!(f.repo.get(1).unwrap().status, BookingStatus::Current);
}

#[tokio::test(start_paused = true)]
async fn test_begin_handoff_errors() {
    let f = fixture();

    assert!(matches!(
        f.service.begin_handoff(99).await,
        Err(DomainError::Booking(BookingError::NotFound { id: 99 }))
    ));
    assert!(matches!(
        f.service.begin_handoff(2).await,
        Err(DomainError::Booking(BookingError::NoHandoffCode { id: 2 }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_issue_handoff_code() {
    let f = fixture();

    let code = f.service.issue_handoff_code(2).await.unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(f.repo.get(2).unwrap().handoff_code, Some(code.clone()));

    let mut session = f.service.begin_handoff(2).await.unwrap();
    session.input_code(&code).await.unwrap();
    f.service.confirm_handoff(&mut session).await.unwrap();

    assert!(matches!(
        f.service.issue_handoff_code(2).await,
        Err(DomainError::Booking(BookingError::InvalidStatus { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_end_trip_not_active() {
    let f = fixture();

    assert!(matches!(
        f.service.end_trip(1).await,
        Err(DomainError::Trip(TripError::NotActive))
    ));
    assert_eq!(f.repo.get(1).unwrap().status, BookingStatus::Current);
}

#[tokio::test(start_paused = true)]
async fn test_end_trip_twice_keeps_duration() {
    let f = fixture();
    f.service.start_trip(1, f.clock.now()).await.unwrap();
    f.clock.advance(chrono::Duration::seconds(42));
    f.service.end_trip(1).await.unwrap();

    f.clock.advance(chrono::Duration::seconds(1000));
    assert!(matches!(
        f.service.end_trip(1).await,
        Err(DomainError::Trip(TripError::NotActive))
    ));
    assert_eq!(f.repo.get(1).unwrap().actual_duration(), Some("00:00:42"));
}

#[tokio::test(start_paused = true)]
async fn test_booking_lists() {
    let f = fixture();
    f.service.start_trip(1, f.clock.now()).await.unwrap();

    assert_eq!(f.service.current_bookings().await.unwrap().len(), 2);
    assert!(f.service.past_bookings().await.unwrap().is_empty());

    f.service.end_trip(1).await.unwrap();

    let current: Vec<u64> = f
        .service
        .current_bookings()
        .await
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    let past: Vec<u64> = f
        .service
        .past_bookings()
        .await
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(current, vec![2]);
    assert_eq!(past, vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_repository_failure_is_reported() {
    let f = fixture();
    f.repo.set_should_fail(true);

    assert!(matches!(
        f.service.begin_handoff(1).await,
        Err(DomainError::Internal { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_samplers() {
    let f = fixture();
    f.service.start_trip(1, f.clock.now()).await.unwrap();
    let rx = f.service.live_elapsed(1).await.unwrap();

    f.service.shutdown().await;
    assert!(f.service.live_elapsed(1).await.is_none());

    f.clock.advance(chrono::Duration::seconds(30));
    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(*rx.borrow(), 0);
}
