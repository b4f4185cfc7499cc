use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::CertificationTier;

pub const METERS_PER_STATUTE_MILE: f64 = 1609.344;

/// One weather snapshot for a location. Immutable once fetched; every
/// safety check re-evaluates against a fresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub visibility_m: f64,
    /// Lowest broken/overcast layer in feet AGL. `None` means unlimited.
    pub cloud_ceiling_ft: Option<f64>,
    pub wind_speed_kt: f64,
    pub wind_direction_deg: f64,
    pub wind_gust_kt: Option<f64>,
    pub precipitation: bool,
    pub precipitation_kind: Option<String>,
    pub thunderstorm: bool,
    pub icing_reported: bool,
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Rejects malformed snapshots so a broken provider can never be
    /// mistaken for safe weather.
    pub fn validate(&self) -> Result<(), ObservationError> {
        Self::finite("temperature_c", self.temperature_c)?;
        Self::finite("humidity_percent", self.humidity_percent)?;
        Self::finite("visibility_m", self.visibility_m)?;
        Self::finite("wind_speed_kt", self.wind_speed_kt)?;
        Self::finite("wind_direction_deg", self.wind_direction_deg)?;
        if let Some(ceiling) = self.cloud_ceiling_ft {
            Self::finite("cloud_ceiling_ft", ceiling)?;
            Self::in_range("cloud_ceiling_ft", ceiling, 0.0, 100_000.0)?;
        }
        if let Some(gust) = self.wind_gust_kt {
            Self::finite("wind_gust_kt", gust)?;
            Self::in_range("wind_gust_kt", gust, 0.0, 300.0)?;
        }
        Self::in_range("humidity_percent", self.humidity_percent, 0.0, 100.0)?;
        Self::in_range("visibility_m", self.visibility_m, 0.0, 500_000.0)?;
        Self::in_range("wind_speed_kt", self.wind_speed_kt, 0.0, 300.0)?;
        Self::in_range("wind_direction_deg", self.wind_direction_deg, 0.0, 360.0)?;
        Ok(())
    }

    /// Visibility converted to statute miles.
    pub fn visibility_sm(&self) -> f64 {
        self.visibility_m / METERS_PER_STATUTE_MILE
    }

    fn finite(field: &'static str, value: f64) -> Result<(), ObservationError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ObservationError::NotFinite { field })
        }
    }

    fn in_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ObservationError> {
        if value < min || value > max {
            return Err(ObservationError::OutOfRange { field, value });
        }
        Ok(())
    }
}

/// Weather minimums for one certification tier. Exactly one record exists
/// per tier and limits only loosen as the tier gains capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyMinimums {
    pub tier: CertificationTier,
    pub min_visibility_sm: f64,
    pub min_ceiling_ft: f64,
    pub max_wind_kt: f64,
    pub max_gust_kt: f64,
    pub max_crosswind_kt: f64,
    pub imc_allowed: bool,
}

/// Values actually measured (and derived) during one evaluation, kept next
/// to the minimums they were compared against for audit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeasuredConditions {
    pub temperature_c: f64,
    pub visibility_sm: f64,
    pub ceiling_ft: Option<f64>,
    pub wind_speed_kt: f64,
    pub wind_gust_kt: Option<f64>,
    pub crosswind_kt: f64,
}

/// Outcome of one safety check. Derived, never cached across observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyEvaluation {
    pub is_safe: bool,
    /// Absolute blockers independent of any threshold.
    pub hazards: Vec<String>,
    /// Threshold comparisons that failed.
    pub violations: Vec<String>,
    pub reasoning: String,
    pub minimums: SafetyMinimums,
    pub measured: MeasuredConditions,
    pub evaluated_at: DateTime<Utc>,
}

impl SafetyEvaluation {
    /// Hazards first, then violations, in evaluation order.
    pub fn unsafe_reasons(&self) -> Vec<String> {
        self.hazards
            .iter()
            .chain(self.violations.iter())
            .cloned()
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
    #[error("observation field {field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("observation field {field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}
