use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::CertificationTier;
use crate::slot::TimeSlot;

/// A validated reschedule alternative for an unsafe booking. Exactly three
/// exist per conflicted booking at any time; a new set supersedes the old.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleCandidate {
    pub booking_id: Uuid,
    pub proposed_start: DateTime<Utc>,
    pub rationale: String,
    /// 1 = best, 3 = last resort.
    pub priority: u8,
    pub trainee_available: bool,
    pub instructor_available: bool,
    pub aircraft_available: bool,
    pub weather_outlook: String,
    pub created_at: DateTime<Utc>,
}

/// Raw proposal as returned by the ranking collaborator, before the
/// contract has been enforced on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProposal {
    pub proposed_start: DateTime<Utc>,
    pub rationale: String,
    pub priority: u8,
    pub weather_outlook: String,
}

/// Context handed to the ranking collaborator: the disrupted booking, why
/// it is unsafe, and the tri-resource open slots it may choose from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRequest {
    pub booking_id: Uuid,
    pub tier: CertificationTier,
    pub location_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub unsafe_reasons: Vec<String>,
    pub open_slots: Vec<TimeSlot>,
}
