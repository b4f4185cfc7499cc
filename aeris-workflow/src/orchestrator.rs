use aeris_domain::{
    Booking, BookingStatus, BookingStore, NotificationDispatcher, RankingClient, ResourceKind,
    RescheduleCandidate, SafetyEvaluation, WeatherProvider, WorkflowRun,
};
use aeris_reschedule::RescheduleService;
use aeris_sched::{intersect, AvailabilityResolver, NoCommonAvailability};
use aeris_weather::evaluate_with_runway;
use anyhow::Context;
use chrono::{Duration, Utc};
use futures_util::future::join_all;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::app_config::Config;

/// Drives one batch reconciliation run: due bookings are checked against
/// live weather, conflicted ones get validated reschedule candidates, and
/// every outcome lands in an audit record. This is the only component that
/// catches failures; everything below it fails loud.
pub struct WorkflowOrchestrator {
    store: Arc<dyn BookingStore>,
    weather: Arc<dyn WeatherProvider>,
    notifier: Arc<dyn NotificationDispatcher>,
    resolver: AvailabilityResolver,
    reschedule: RescheduleService,
    config: Config,
}

struct BookingOutcome {
    is_unsafe: bool,
    notified: bool,
}

impl WorkflowOrchestrator {
    pub fn new(
        store: Arc<dyn BookingStore>,
        weather: Arc<dyn WeatherProvider>,
        ranking: Arc<dyn RankingClient>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: Config,
    ) -> Self {
        Self {
            resolver: AvailabilityResolver::new(store.clone()),
            reschedule: RescheduleService::new(ranking),
            store,
            weather,
            notifier,
            config,
        }
    }

    /// One reconciliation invocation. Always completes and always persists
    /// a `WorkflowRun`, even when every booking fails.
    pub async fn run(&self, only: Option<&[Uuid]>) -> Result<WorkflowRun, WorkflowError> {
        let started_at = Utc::now();
        let horizon_end = started_at + Duration::hours(self.config.workflow.look_ahead_hours);
        let due = self
            .store
            .find_due_bookings(
                started_at,
                horizon_end,
                &[BookingStatus::Scheduled, BookingStatus::Confirmed],
                only,
            )
            .await
            .map_err(WorkflowError::Store)?;

        info!(due = due.len(), "workflow run started");
        if due.is_empty() {
            let run = WorkflowRun::empty(started_at, Utc::now());
            self.store
                .append_run(&run)
                .await
                .map_err(WorkflowError::Store)?;
            return Ok(run);
        }

        // 1. Mark everything checking up front, best-effort.
        for booking in &due {
            if let Err(err) = self
                .store
                .update_status(booking.id, BookingStatus::Checking)
                .await
            {
                warn!(booking_id = %booking.id, error = %err, "failed to mark booking checking");
            }
        }

        // 2. Process in fixed-size batches; within a batch every booking
        // settles independently and no failure cancels a sibling.
        let mut checked = 0usize;
        let mut unsafe_count = 0usize;
        let mut notifications = 0usize;
        let mut errors = Vec::new();

        for batch in due.chunks(self.config.workflow.batch_size.max(1)) {
            let attempts = batch.iter().map(|booking| self.process_booking(booking));
            let outcomes = join_all(attempts).await;

            for (booking, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(result) => {
                        checked += 1;
                        if result.is_unsafe {
                            unsafe_count += 1;
                        }
                        if result.notified {
                            notifications += 1;
                        }
                    }
                    Err(err) => {
                        error!(booking_id = %booking.id, error = %err, "booking reconciliation failed");
                        // Fail-safe: never leave the booking stuck in
                        // checking or half-resolved conflict.
                        if let Err(revert) = self
                            .store
                            .update_status(booking.id, BookingStatus::Scheduled)
                            .await
                        {
                            error!(booking_id = %booking.id, error = %revert, "failed to revert booking to scheduled");
                        }
                        let message = format!("booking {}: {:#}", booking.id, err);
                        if let Err(log_err) =
                            self.store.append_error_log(booking.id, &message).await
                        {
                            warn!(booking_id = %booking.id, error = %log_err, "failed to append error log");
                        }
                        errors.push(message);
                    }
                }
            }
        }

        let finished_at = Utc::now();
        let run = WorkflowRun {
            id: Uuid::new_v4(),
            started_at,
            finished_at,
            total_bookings: due.len(),
            checked_bookings: checked,
            unsafe_bookings: unsafe_count,
            notifications_sent: notifications,
            duration_ms: (finished_at - started_at).num_milliseconds(),
            errors,
        };
        self.store
            .append_run(&run)
            .await
            .map_err(WorkflowError::Store)?;

        info!(
            total = run.total_bookings,
            checked = run.checked_bookings,
            conflicts = run.unsafe_bookings,
            notified = run.notifications_sent,
            failed = run.errors.len(),
            "workflow run finished"
        );
        Ok(run)
    }

    /// The per-booking pipeline. Any error bubbles to `run`, which reverts
    /// the booking and records the failure.
    async fn process_booking(&self, booking: &Booking) -> anyhow::Result<BookingOutcome> {
        let observation = match timeout(
            self.call_timeout(),
            self.weather
                .fetch(booking.location.latitude, booking.location.longitude),
        )
        .await
        {
            Ok(result) => result
                .map_err(|e| anyhow::anyhow!(e))
                .context("weather fetch failed")?,
            Err(_) => anyhow::bail!("weather fetch timed out"),
        };

        let mut evaluation = evaluate_with_runway(
            &observation,
            booking.tier,
            self.config.weather.runway_heading,
        )?;
        if self.config.workflow.force_conflict && evaluation.is_safe {
            evaluation = force_conflict(evaluation);
        }
        self.store
            .append_evaluation(booking.id, &evaluation)
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to persist evaluation")?;

        if evaluation.is_safe {
            // Never leave a safe booking parked in checking.
            self.store
                .update_status(booking.id, BookingStatus::Scheduled)
                .await
                .map_err(|e| anyhow::anyhow!(e))
                .context("failed to restore booking")?;
            info!(booking_id = %booking.id, "weather safe, booking restored");
            return Ok(BookingOutcome {
                is_unsafe: false,
                notified: false,
            });
        }

        self.store
            .update_status(booking.id, BookingStatus::Conflict)
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to mark booking conflicted")?;
        info!(booking_id = %booking.id, reasons = evaluation.unsafe_reasons().len(), "weather conflict detected");

        let trainee_slots = self
            .resolver
            .resolve(
                ResourceKind::Trainee,
                booking.trainee_id,
                Some(booking.tier),
                Some(booking.id),
            )
            .await?;
        let instructor_slots = self
            .resolver
            .resolve(
                ResourceKind::Instructor,
                booking.instructor_id,
                None,
                Some(booking.id),
            )
            .await?;
        let aircraft_slots = self
            .resolver
            .resolve(
                ResourceKind::Aircraft,
                booking.aircraft_id,
                None,
                Some(booking.id),
            )
            .await?;

        let open_slots = intersect(&trainee_slots, &instructor_slots, &aircraft_slots);
        if open_slots.is_empty() {
            return Err(NoCommonAvailability.into());
        }

        let candidates = timeout(
            self.call_timeout(),
            self.reschedule
                .request_candidates(booking, &evaluation, &open_slots),
        )
        .await
        .map_err(|_| anyhow::anyhow!("ranking call timed out"))??;

        self.store
            .replace_candidates(booking.id, &candidates)
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to persist candidates")?;

        let notified = self.notify(booking, &evaluation, &candidates).await?;
        Ok(BookingOutcome {
            is_unsafe: true,
            notified,
        })
    }

    async fn notify(
        &self,
        booking: &Booking,
        evaluation: &SafetyEvaluation,
        candidates: &[RescheduleCandidate],
    ) -> anyhow::Result<bool> {
        let trainee = self
            .store
            .get_trainee(booking.trainee_id)
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to look up trainee")?;
        let Some(trainee) = trainee else {
            warn!(booking_id = %booking.id, "no trainee record, skipping notification");
            return Ok(false);
        };

        let subject = format!(
            "Weather conflict for your {} flight",
            booking.scheduled_at.format("%Y-%m-%d %H:%M")
        );
        let body = notification_body(booking, evaluation, candidates);

        let receipt = match timeout(
            self.call_timeout(),
            self.notifier.send(&trainee.email, &subject, &body),
        )
        .await
        {
            Ok(result) => result
                .map_err(|e| anyhow::anyhow!(e))
                .context("notification dispatch failed")?,
            Err(_) => anyhow::bail!("notification dispatch timed out"),
        };

        if receipt.success {
            info!(booking_id = %booking.id, message_id = ?receipt.message_id, "notification sent");
            Ok(true)
        } else {
            warn!(booking_id = %booking.id, error = ?receipt.error, "notification rejected by dispatcher");
            Ok(false)
        }
    }

    fn call_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.config.workflow.call_timeout_seconds)
    }
}

/// Plain combined weather + reschedule summary. Branding and templating
/// belong to the dispatcher, not here.
fn notification_body(
    booking: &Booking,
    evaluation: &SafetyEvaluation,
    candidates: &[RescheduleCandidate],
) -> String {
    let mut body = format!(
        "Your flight from {} on {} cannot go ahead as scheduled.\n{}\n\nProposed alternatives:\n",
        booking.location.name,
        booking.scheduled_at.format("%Y-%m-%d %H:%M UTC"),
        evaluation.reasoning,
    );
    for candidate in candidates {
        body.push_str(&format!(
            "{}. {} - {} ({})\n",
            candidate.priority,
            candidate.proposed_start.format("%Y-%m-%d %H:%M UTC"),
            candidate.rationale,
            candidate.weather_outlook,
        ));
    }
    body
}

/// Testing-mode override: keeps the real evaluation but forces the unsafe
/// path with a synthetic hazard. The evaluator itself is never touched.
fn force_conflict(mut evaluation: SafetyEvaluation) -> SafetyEvaluation {
    evaluation.is_safe = false;
    evaluation
        .hazards
        .push("synthetic hazard: conflict forced by testing mode".to_string());
    evaluation.reasoning = format!(
        "Conflict forced by testing mode. Original assessment: {}",
        evaluation.reasoning
    );
    evaluation
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("store operation failed: {0}")]
    Store(#[source] Box<dyn Error + Send + Sync>),
}
