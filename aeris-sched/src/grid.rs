use aeris_domain::TimeSlot;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Planning horizon in days.
pub const GRID_DAYS: i64 = 7;
/// First and last hourly starting points of the operational day.
pub const FIRST_START_HOUR: u32 = 7;
pub const LAST_START_HOUR: u32 = 18;
/// Fixed slot width in hours.
pub const SLOT_HOURS: i64 = 2;

/// The shared slot grid every resource's availability is drawn from:
/// hourly starting points 07:00-18:00 over the next `GRID_DAYS` days, each
/// slot `SLOT_HOURS` wide. Starts already in the past are discarded.
///
/// All three resource grids share this quantization; downstream exact-start
/// matching depends on it.
pub fn base_grid(now: DateTime<Utc>) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let today = now.date_naive();
    for day in 0..GRID_DAYS {
        let date = today + Duration::days(day);
        for hour in FIRST_START_HOUR..=LAST_START_HOUR {
            let naive = date
                .and_hms_opt(hour, 0, 0)
                .expect("grid hours are valid times");
            let start = Utc.from_utc_datetime(&naive);
            if start > now {
                slots.push(TimeSlot::from_start(start, Duration::hours(SLOT_HOURS)));
            }
        }
    }
    slots
}
