use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::CertificationTier;

/// Registry record for a trainee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: CertificationTier,
}

/// Registry record for an instructor, with their fixed weekly teaching
/// windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub weekly_windows: Vec<WeeklyWindow>,
}

/// A recurring availability window: `[start_hour, end_hour)` on one weekday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeeklyWindow {
    pub weekday: Weekday,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl WeeklyWindow {
    pub fn covers(&self, weekday: Weekday, hour: u32) -> bool {
        self.weekday == weekday && hour >= self.start_hour && hour < self.end_hour
    }
}

/// Registry record for an aircraft. One weekday per airframe is reserved
/// for recurring maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Uuid,
    pub tail_number: String,
    pub model: String,
    pub maintenance_weekday: Weekday,
}
