use aeris_domain::{
    Booking, CandidateProposal, RankingClient, RankingRequest, RescheduleCandidate,
    SafetyEvaluation, TimeSlot,
};
use chrono::{DateTime, Duration, Timelike, Utc};
use std::error::Error;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// The contract demands exactly this many candidates per unsafe booking.
pub const REQUIRED_CANDIDATES: usize = 3;
/// Proposals may reach at most this far ahead.
pub const MAX_DAYS_AHEAD: i64 = 7;
/// Proposed local start hour must fall in `[EARLIEST_HOUR, LATEST_HOUR)`.
pub const EARLIEST_HOUR: u32 = 7;
pub const LATEST_HOUR: u32 = 18;

/// Obtains ranked reschedule proposals from the external collaborator and
/// enforces the output contract before anything downstream sees them.
pub struct RescheduleService {
    ranking: Arc<dyn RankingClient>,
}

impl RescheduleService {
    pub fn new(ranking: Arc<dyn RankingClient>) -> Self {
        Self { ranking }
    }

    /// One ranking call, then validation. A contract violation is a hard
    /// failure for this booking's reconciliation attempt; nothing is
    /// repaired silently.
    pub async fn request_candidates(
        &self,
        booking: &Booking,
        evaluation: &SafetyEvaluation,
        open_slots: &[TimeSlot],
    ) -> Result<Vec<RescheduleCandidate>, CandidateError> {
        let request = RankingRequest {
            booking_id: booking.id,
            tier: booking.tier,
            location_name: booking.location.name.clone(),
            scheduled_at: booking.scheduled_at,
            duration_minutes: booking.duration_minutes,
            unsafe_reasons: evaluation.unsafe_reasons(),
            open_slots: open_slots.to_vec(),
        };
        let proposals = self
            .ranking
            .rank_candidates(&request)
            .await
            .map_err(CandidateError::Ranking)?;
        debug!(
            booking_id = %booking.id,
            proposals = proposals.len(),
            "ranking collaborator responded"
        );
        validate_proposals(booking.id, &proposals, open_slots, Utc::now())
    }
}

/// Enforces the candidate contract and converts accepted proposals into
/// persisted candidates, sorted ascending by priority.
pub fn validate_proposals(
    booking_id: Uuid,
    proposals: &[CandidateProposal],
    open_slots: &[TimeSlot],
    now: DateTime<Utc>,
) -> Result<Vec<RescheduleCandidate>, CandidateError> {
    if proposals.len() != REQUIRED_CANDIDATES {
        return Err(CandidateError::WrongCount {
            expected: REQUIRED_CANDIDATES,
            actual: proposals.len(),
        });
    }

    let latest_allowed = now + Duration::days(MAX_DAYS_AHEAD);
    for (index, proposal) in proposals.iter().enumerate() {
        if !open_slots
            .iter()
            .any(|slot| slot.start == proposal.proposed_start)
        {
            return Err(CandidateError::FabricatedStart {
                index,
                start: proposal.proposed_start,
            });
        }
        if proposal.proposed_start <= now {
            return Err(CandidateError::NotInFuture {
                index,
                start: proposal.proposed_start,
            });
        }
        if proposal.proposed_start > latest_allowed {
            return Err(CandidateError::TooFarAhead {
                index,
                start: proposal.proposed_start,
            });
        }
        let hour = proposal.proposed_start.hour();
        if !(EARLIEST_HOUR..LATEST_HOUR).contains(&hour) {
            return Err(CandidateError::OutsideOperatingHours { index, hour });
        }
        if proposal.rationale.trim().is_empty() {
            return Err(CandidateError::EmptyRationale { index });
        }
    }

    let mut priorities: Vec<u8> = proposals.iter().map(|p| p.priority).collect();
    priorities.sort_unstable();
    if priorities != [1, 2, 3] {
        return Err(CandidateError::BadPrioritySet { priorities });
    }

    let mut candidates: Vec<RescheduleCandidate> = proposals
        .iter()
        .map(|proposal| RescheduleCandidate {
            booking_id,
            proposed_start: proposal.proposed_start,
            rationale: proposal.rationale.clone(),
            priority: proposal.priority,
            // Starts are drawn from the tri-resource overlap set, so all
            // three resources are free by construction.
            trainee_available: true,
            instructor_available: true,
            aircraft_available: true,
            weather_outlook: proposal.weather_outlook.clone(),
            created_at: now,
        })
        .collect();
    candidates.sort_by_key(|candidate| candidate.priority);
    Ok(candidates)
}

#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("ranking collaborator call failed: {0}")]
    Ranking(#[source] Box<dyn Error + Send + Sync>),

    #[error("expected exactly {expected} candidates, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("candidate {index}: proposed start {start} does not match any open slot")]
    FabricatedStart { index: usize, start: DateTime<Utc> },

    #[error("candidate {index}: proposed start {start} is not in the future")]
    NotInFuture { index: usize, start: DateTime<Utc> },

    #[error("candidate {index}: proposed start {start} is more than 7 days ahead")]
    TooFarAhead { index: usize, start: DateTime<Utc> },

    #[error("candidate {index}: start hour {hour} is outside operating hours 07:00-18:00")]
    OutsideOperatingHours { index: usize, hour: u32 },

    #[error("candidate {index}: rationale is empty")]
    EmptyRationale { index: usize },

    #[error("candidate priorities {priorities:?} must be exactly {{1, 2, 3}}")]
    BadPrioritySet { priorities: Vec<u8> },
}
