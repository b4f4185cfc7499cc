use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus, ResourceKind};
use crate::candidate::{CandidateProposal, RankingRequest, RescheduleCandidate};
use crate::resources::{Aircraft, Instructor, Trainee};
use crate::run::WorkflowRun;
use crate::weather::{SafetyEvaluation, WeatherObservation};

/// Persistent store for bookings, resource registries and append-only
/// audit records. The engine is purely a consumer; evaluations, candidate
/// sets, runs and error-log entries are single-document writes with no
/// cross-booking transactions.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Bookings starting within `[from, to)` whose status is in `statuses`,
    /// optionally narrowed to an explicit id set.
    async fn find_due_bookings(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        statuses: &[BookingStatus],
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>>;

    /// Existing commitments of one resource within `[from, to)`, regardless
    /// of status. Callers filter cancelled and excluded bookings.
    async fn find_commitments(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>>;

    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn append_evaluation(
        &self,
        booking_id: Uuid,
        evaluation: &SafetyEvaluation,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replaces the booking's candidate set; a new set supersedes any
    /// previous one.
    async fn replace_candidates(
        &self,
        booking_id: Uuid,
        candidates: &[RescheduleCandidate],
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn append_run(&self, run: &WorkflowRun) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn append_error_log(
        &self,
        booking_id: Uuid,
        message: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn get_trainee(
        &self,
        id: Uuid,
    ) -> Result<Option<Trainee>, Box<dyn Error + Send + Sync>>;

    async fn get_instructor(
        &self,
        id: Uuid,
    ) -> Result<Option<Instructor>, Box<dyn Error + Send + Sync>>;

    async fn get_aircraft(
        &self,
        id: Uuid,
    ) -> Result<Option<Aircraft>, Box<dyn Error + Send + Sync>>;
}

/// Raw weather source. Every call is potentially stale but authoritative
/// for that call; any caching sits in front of this trait.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherObservation, Box<dyn Error + Send + Sync>>;
}

/// External service that phrases and ranks reschedule proposals. Its
/// response is structured data and is never trusted until validated.
#[async_trait]
pub trait RankingClient: Send + Sync {
    async fn rank_candidates(
        &self,
        request: &RankingRequest,
    ) -> Result<Vec<CandidateProposal>, Box<dyn Error + Send + Sync>>;
}

/// Outbound notification channel. Transport is the collaborator's concern;
/// the engine only learns success or failure.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<DispatchReceipt, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}
