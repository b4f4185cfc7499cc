use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slot::TimeSlot;

/// A flight-training booking tying a trainee, an instructor and an aircraft
/// to one scheduled lesson. Owned by the persistent store; the engine only
/// reads it and requests status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub trainee_id: Uuid,
    pub instructor_id: Uuid,
    pub aircraft_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub location: Location,
    pub tier: CertificationTier,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn end_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(self.duration_minutes)
    }

    /// The booked interval as a half-open slot.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.scheduled_at, self.end_at())
    }
}

/// Departure location of the lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Booking lifecycle. `Cancelled` is absorbing and only ever set by an
/// external actor; the workflow never assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Scheduled,
    Checking,
    Conflict,
    Rescheduled,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "SCHEDULED",
            BookingStatus::Checking => "CHECKING",
            BookingStatus::Conflict => "CONFLICT",
            BookingStatus::Rescheduled => "RESCHEDULED",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trainee certification level, ordered by capability. A more capable tier
/// is never subject to stricter weather minimums than a less capable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificationTier {
    Student,
    Private,
    Instrument,
    Commercial,
}

impl CertificationTier {
    pub const ALL: [CertificationTier; 4] = [
        CertificationTier::Student,
        CertificationTier::Private,
        CertificationTier::Instrument,
        CertificationTier::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CertificationTier::Student => "STUDENT",
            CertificationTier::Private => "PRIVATE",
            CertificationTier::Instrument => "INSTRUMENT",
            CertificationTier::Commercial => "COMMERCIAL",
        }
    }
}

impl std::fmt::Display for CertificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three independent resource kinds a booking reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Trainee,
    Instructor,
    Aircraft,
}
