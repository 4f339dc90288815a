//! Events exchanged between the handoff session and the booking flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::BookingId;

/// Trip lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripEvent {
    /// The handoff code was verified; the trip timer should start
    Started {
        booking_id: BookingId,
        challenge_id: Uuid,
        at: DateTime<Utc>,
    },
    /// The rider ended the trip
    Ended {
        booking_id: BookingId,
        at: DateTime<Utc>,
        duration: String,
        seconds: u64,
    },
}

impl TripEvent {
    pub fn booking_id(&self) -> BookingId {
        match self {
            TripEvent::Started { booking_id, .. } | TripEvent::Ended { booking_id, .. } => {
                *booking_id
            }
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            TripEvent::Started { at, .. } | TripEvent::Ended { at, .. } => *at,
        }
    }
}
