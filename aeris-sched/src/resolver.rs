use aeris_domain::{
    Aircraft, BookingStatus, BookingStore, CertificationTier, ResourceKind, TimeSlot, WeeklyWindow,
};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::grid::{base_grid, GRID_DAYS};

/// Post-flight turnaround added to every existing commitment before it
/// blocks the grid, independent of the booking's own duration.
pub const TURNAROUND_MINUTES: i64 = 30;

/// Computes candidate free slots for one resource: the eligible portion of
/// the shared grid minus intervals blocked by existing commitments.
pub struct AvailabilityResolver {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityResolver {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Free slots for the resource over the planning horizon, ascending by
    /// start, no duplicate starts. An unknown resource id yields an empty
    /// list rather than an error.
    pub async fn resolve(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        tier: Option<CertificationTier>,
        exclude_booking: Option<Uuid>,
    ) -> Result<Vec<TimeSlot>, ScheduleError> {
        self.resolve_at(kind, resource_id, tier, exclude_booking, Utc::now())
            .await
    }

    pub async fn resolve_at(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        tier: Option<CertificationTier>,
        exclude_booking: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Vec<TimeSlot>, ScheduleError> {
        // 1. Eligible portion of the shared grid for this resource.
        let eligible = match kind {
            ResourceKind::Trainee => {
                let Some(trainee) = self.store.get_trainee(resource_id).await? else {
                    return Ok(Vec::new());
                };
                trainee_grid(now, tier.unwrap_or(trainee.tier))
            }
            ResourceKind::Instructor => {
                let Some(instructor) = self.store.get_instructor(resource_id).await? else {
                    return Ok(Vec::new());
                };
                instructor_grid(now, &instructor.weekly_windows)
            }
            ResourceKind::Aircraft => {
                let Some(aircraft) = self.store.get_aircraft(resource_id).await? else {
                    return Ok(Vec::new());
                };
                aircraft_grid(now, &aircraft)
            }
        };

        // 2. Commitments over the horizon, expanded by the turnaround buffer.
        let horizon_end = now + Duration::days(GRID_DAYS);
        let commitments = self
            .store
            .find_commitments(kind, resource_id, now, horizon_end)
            .await?;
        let blocked: Vec<TimeSlot> = commitments
            .iter()
            .filter(|booking| booking.status != BookingStatus::Cancelled)
            .filter(|booking| exclude_booking != Some(booking.id))
            .map(|booking| {
                TimeSlot::new(
                    booking.scheduled_at,
                    booking.end_at() + Duration::minutes(TURNAROUND_MINUTES),
                )
            })
            .collect();

        // 3. Drop every eligible slot that touches a blocked interval.
        let mut free: Vec<TimeSlot> = eligible
            .into_iter()
            .filter(|slot| !blocked.iter().any(|block| slot.overlaps(block)))
            .collect();
        free.sort_by_key(|slot| slot.start);
        free.dedup_by_key(|slot| slot.start);

        debug!(
            kind = ?kind,
            resource_id = %resource_id,
            blocked = blocked.len(),
            free = free.len(),
            "availability resolved"
        );
        Ok(free)
    }
}

/// Tier gates the weekday hours a trainee may book; weekends are open to
/// everyone.
fn trainee_grid(now: DateTime<Utc>, tier: CertificationTier) -> Vec<TimeSlot> {
    base_grid(now)
        .into_iter()
        .filter(|slot| {
            let weekend = matches!(slot.start.weekday(), Weekday::Sat | Weekday::Sun);
            match tier {
                CertificationTier::Student => weekend || slot.start.hour() >= 13,
                CertificationTier::Private => weekend || slot.start.hour() >= 10,
                CertificationTier::Instrument | CertificationTier::Commercial => true,
            }
        })
        .collect()
}

fn instructor_grid(now: DateTime<Utc>, windows: &[WeeklyWindow]) -> Vec<TimeSlot> {
    base_grid(now)
        .into_iter()
        .filter(|slot| {
            windows
                .iter()
                .any(|window| window.covers(slot.start.weekday(), slot.start.hour()))
        })
        .collect()
}

/// A stable pseudo-random subset of the grid per airframe (hash of id and
/// slot start), minus the recurring maintenance weekday.
fn aircraft_grid(now: DateTime<Utc>, aircraft: &Aircraft) -> Vec<TimeSlot> {
    base_grid(now)
        .into_iter()
        .filter(|slot| slot.start.weekday() != aircraft.maintenance_weekday)
        .filter(|slot| stable_keep(aircraft.id, slot.start))
        .collect()
}

/// FNV-1a over the aircraft id and slot start; drops one slot in four.
/// Deterministic so repeated resolutions agree with each other.
fn stable_keep(aircraft_id: Uuid, start: DateTime<Utc>) -> bool {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x1_0000_0000_01b3;
    let mut hash = FNV_OFFSET;
    let bytes = aircraft_id
        .as_bytes()
        .iter()
        .copied()
        .chain(start.timestamp().to_be_bytes());
    for byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash % 4 != 0
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("store query failed: {0}")]
    Store(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeris_domain::{
        Booking, Instructor, Location, RescheduleCandidate, SafetyEvaluation, Trainee, WorkflowRun,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::error::Error;

    struct FakeStore {
        trainees: Vec<Trainee>,
        instructors: Vec<Instructor>,
        aircraft: Vec<Aircraft>,
        commitments: Vec<Booking>,
    }

    impl FakeStore {
        fn empty() -> Self {
            Self {
                trainees: Vec::new(),
                instructors: Vec::new(),
                aircraft: Vec::new(),
                commitments: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl BookingStore for FakeStore {
        async fn find_due_bookings(
            &self,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
            _statuses: &[BookingStatus],
            _ids: Option<&[Uuid]>,
        ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>> {
            unimplemented!("not used by resolver tests")
        }

        async fn find_commitments(
            &self,
            _kind: ResourceKind,
            _resource_id: Uuid,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>> {
            Ok(self.commitments.clone())
        }

        async fn update_status(
            &self,
            _booking_id: Uuid,
            _status: BookingStatus,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            unimplemented!("not used by resolver tests")
        }

        async fn append_evaluation(
            &self,
            _booking_id: Uuid,
            _evaluation: &SafetyEvaluation,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            unimplemented!("not used by resolver tests")
        }

        async fn replace_candidates(
            &self,
            _booking_id: Uuid,
            _candidates: &[RescheduleCandidate],
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            unimplemented!("not used by resolver tests")
        }

        async fn append_run(
            &self,
            _run: &WorkflowRun,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            unimplemented!("not used by resolver tests")
        }

        async fn append_error_log(
            &self,
            _booking_id: Uuid,
            _message: &str,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            unimplemented!("not used by resolver tests")
        }

        async fn get_trainee(
            &self,
            id: Uuid,
        ) -> Result<Option<Trainee>, Box<dyn Error + Send + Sync>> {
            Ok(self.trainees.iter().find(|t| t.id == id).cloned())
        }

        async fn get_instructor(
            &self,
            id: Uuid,
        ) -> Result<Option<Instructor>, Box<dyn Error + Send + Sync>> {
            Ok(self.instructors.iter().find(|i| i.id == id).cloned())
        }

        async fn get_aircraft(
            &self,
            id: Uuid,
        ) -> Result<Option<Aircraft>, Box<dyn Error + Send + Sync>> {
            Ok(self.aircraft.iter().find(|a| a.id == id).cloned())
        }
    }

    // 2026-03-09 is a Monday.
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 6, 0, 0).unwrap()
    }

    fn trainee(tier: CertificationTier) -> Trainee {
        Trainee {
            id: Uuid::new_v4(),
            name: "Jordan Blake".to_string(),
            email: "jordan@example.com".to_string(),
            tier,
        }
    }

    fn booking_for(trainee_id: Uuid, start: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            trainee_id,
            instructor_id: Uuid::new_v4(),
            aircraft_id: Uuid::new_v4(),
            scheduled_at: start,
            duration_minutes: 120,
            location: Location {
                name: "Hayward Executive".to_string(),
                latitude: 37.659,
                longitude: -122.122,
            },
            tier: CertificationTier::Student,
            status: BookingStatus::Scheduled,
            created_at: start,
            updated_at: start,
        }
    }

    #[tokio::test]
    async fn unknown_resource_yields_empty_list() {
        let resolver = AvailabilityResolver::new(Arc::new(FakeStore::empty()));
        let slots = resolver
            .resolve_at(
                ResourceKind::Trainee,
                Uuid::new_v4(),
                None,
                None,
                monday_morning(),
            )
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn student_weekday_slots_start_in_the_afternoon() {
        let student = trainee(CertificationTier::Student);
        let store = FakeStore {
            trainees: vec![student.clone()],
            ..FakeStore::empty()
        };
        let resolver = AvailabilityResolver::new(Arc::new(store));

        let slots = resolver
            .resolve_at(
                ResourceKind::Trainee,
                student.id,
                None,
                None,
                monday_morning(),
            )
            .await
            .unwrap();

        assert!(!slots.is_empty());
        for slot in &slots {
            let weekend = matches!(slot.start.weekday(), Weekday::Sat | Weekday::Sun);
            assert!(weekend || slot.start.hour() >= 13, "bad slot {:?}", slot);
        }
    }

    #[tokio::test]
    async fn commercial_trainee_gets_the_full_grid() {
        let pilot = trainee(CertificationTier::Commercial);
        let store = FakeStore {
            trainees: vec![pilot.clone()],
            ..FakeStore::empty()
        };
        let resolver = AvailabilityResolver::new(Arc::new(store));

        let slots = resolver
            .resolve_at(ResourceKind::Trainee, pilot.id, None, None, monday_morning())
            .await
            .unwrap();

        assert_eq!(slots.len(), base_grid(monday_morning()).len());
    }

    #[tokio::test]
    async fn instructor_limited_to_weekly_windows() {
        let instructor = Instructor {
            id: Uuid::new_v4(),
            name: "Sam Okafor".to_string(),
            email: "sam@example.com".to_string(),
            weekly_windows: vec![WeeklyWindow {
                weekday: Weekday::Tue,
                start_hour: 9,
                end_hour: 14,
            }],
        };
        let store = FakeStore {
            instructors: vec![instructor.clone()],
            ..FakeStore::empty()
        };
        let resolver = AvailabilityResolver::new(Arc::new(store));

        let slots = resolver
            .resolve_at(
                ResourceKind::Instructor,
                instructor.id,
                None,
                None,
                monday_morning(),
            )
            .await
            .unwrap();

        // One Tuesday in the horizon, hours 9..14.
        assert_eq!(slots.len(), 5);
        assert!(slots
            .iter()
            .all(|s| s.start.weekday() == Weekday::Tue && (9..14).contains(&s.start.hour())));
    }

    #[tokio::test]
    async fn aircraft_maintenance_weekday_blacked_out_and_subset_stable() {
        let plane = Aircraft {
            id: Uuid::new_v4(),
            tail_number: "N417AE".to_string(),
            model: "Cessna 172S".to_string(),
            maintenance_weekday: Weekday::Wed,
        };
        let store = Arc::new(FakeStore {
            aircraft: vec![plane.clone()],
            ..FakeStore::empty()
        });
        let resolver = AvailabilityResolver::new(store);

        let first = resolver
            .resolve_at(
                ResourceKind::Aircraft,
                plane.id,
                None,
                None,
                monday_morning(),
            )
            .await
            .unwrap();
        let second = resolver
            .resolve_at(
                ResourceKind::Aircraft,
                plane.id,
                None,
                None,
                monday_morning(),
            )
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.start.weekday() != Weekday::Wed));
        // The pseudo-stable subset keeps most of the remaining grid.
        let remaining = base_grid(monday_morning())
            .iter()
            .filter(|s| s.start.weekday() != Weekday::Wed)
            .count();
        assert!(first.len() > remaining / 2);
        assert!(first.len() < remaining);
    }

    #[tokio::test]
    async fn commitments_block_slots_including_turnaround() {
        let pilot = trainee(CertificationTier::Commercial);
        // Committed 09:00-11:00 on Tuesday; with the 30 min turnaround the
        // 11:00 grid slot is blocked too.
        let committed_start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let store = FakeStore {
            trainees: vec![pilot.clone()],
            commitments: vec![booking_for(pilot.id, committed_start)],
            ..FakeStore::empty()
        };
        let resolver = AvailabilityResolver::new(Arc::new(store));

        let slots = resolver
            .resolve_at(ResourceKind::Trainee, pilot.id, None, None, monday_morning())
            .await
            .unwrap();

        // Half-open overlap: the 07:00-09:00 slot ends exactly as the
        // commitment starts, so it stays free.
        let blocked_hours = [8u32, 9, 10, 11];
        for slot in &slots {
            if slot.start.date_naive() == committed_start.date_naive() {
                assert!(
                    !blocked_hours.contains(&slot.start.hour()),
                    "slot {:?} should be blocked",
                    slot,
                );
            }
        }
        assert!(slots
            .iter()
            .any(|s| s.start.date_naive() == committed_start.date_naive()
                && s.start.hour() == 12));
    }

    #[tokio::test]
    async fn excluded_booking_does_not_block() {
        let pilot = trainee(CertificationTier::Commercial);
        let committed_start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let commitment = booking_for(pilot.id, committed_start);
        let commitment_id = commitment.id;
        let store = FakeStore {
            trainees: vec![pilot.clone()],
            commitments: vec![commitment],
            ..FakeStore::empty()
        };
        let resolver = AvailabilityResolver::new(Arc::new(store));

        let slots = resolver
            .resolve_at(
                ResourceKind::Trainee,
                pilot.id,
                None,
                Some(commitment_id),
                monday_morning(),
            )
            .await
            .unwrap();

        assert!(slots
            .iter()
            .any(|s| s.start == committed_start));
    }

    #[tokio::test]
    async fn cancelled_commitments_do_not_block() {
        let pilot = trainee(CertificationTier::Commercial);
        let committed_start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut commitment = booking_for(pilot.id, committed_start);
        commitment.status = BookingStatus::Cancelled;
        let store = FakeStore {
            trainees: vec![pilot.clone()],
            commitments: vec![commitment],
            ..FakeStore::empty()
        };
        let resolver = AvailabilityResolver::new(Arc::new(store));

        let slots = resolver
            .resolve_at(ResourceKind::Trainee, pilot.id, None, None, monday_morning())
            .await
            .unwrap();

        assert!(slots.iter().any(|s| s.start == committed_start));
    }
}
