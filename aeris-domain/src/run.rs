use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit record for one batch reconciliation invocation. Built once the
/// run settles and persisted unconditionally, even when every booking
/// failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_bookings: usize,
    pub checked_bookings: usize,
    pub unsafe_bookings: usize,
    pub notifications_sent: usize,
    pub duration_ms: i64,
    /// Per-booking failure strings, in batch order.
    pub errors: Vec<String>,
}

impl WorkflowRun {
    /// An empty run for an invocation that found no due bookings.
    pub fn empty(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            finished_at,
            total_bookings: 0,
            checked_bookings: 0,
            unsafe_bookings: 0,
            notifications_sent: 0,
            duration_ms: (finished_at - started_at).num_milliseconds(),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn empty_run_has_zero_counters() {
        let started = Utc::now();
        let run = WorkflowRun::empty(started, started + Duration::milliseconds(25));
        assert_eq!(run.total_bookings, 0);
        assert_eq!(run.errors.len(), 0);
        assert_eq!(run.duration_ms, 25);
    }
}
