use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open bookable interval `[start, end)` drawn from the hourly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Half-open overlap test: `[a.start, a.end)` and `[b.start, b.end)`
    /// overlap iff `a.start < b.end && b.start < a.end`. Touching ends do
    /// not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(start_hour: u32, end_hour: u32) -> TimeSlot {
        TimeSlot::new(
            Utc.with_ymd_and_hms(2026, 3, 14, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 14, end_hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn overlapping_slots_detected() {
        assert!(slot(9, 11).overlaps(&slot(10, 12)));
        assert!(slot(10, 12).overlaps(&slot(9, 11)));
        assert!(slot(9, 11).overlaps(&slot(9, 11)));
    }

    #[test]
    fn touching_slots_do_not_overlap() {
        assert!(!slot(9, 11).overlaps(&slot(11, 13)));
        assert!(!slot(11, 13).overlaps(&slot(9, 11)));
    }

    #[test]
    fn contains_is_half_open() {
        let s = slot(9, 11);
        assert!(s.contains(s.start));
        assert!(!s.contains(s.end));
    }
}
