use aeris_domain::{
    CertificationTier, MeasuredConditions, ObservationError, SafetyEvaluation, WeatherObservation,
};
use chrono::Utc;

use crate::minimums::minimums_for;

/// Runway heading assumed when the caller does not supply one.
pub const DEFAULT_RUNWAY_HEADING: f64 = 360.0;

/// Visibility/ceiling line below which conditions are instrument
/// meteorological conditions regardless of tier.
const IMC_VISIBILITY_SM: f64 = 3.0;
const IMC_CEILING_FT: f64 = 1000.0;

/// Temperature band and moisture conditions under which airframe icing is
/// likely.
const ICING_TEMP_MIN_C: f64 = -10.0;
const ICING_TEMP_MAX_C: f64 = 10.0;
const ICING_HUMIDITY_PCT: f64 = 80.0;

/// Classifies one observation against the tier's minimums, assuming the
/// default runway heading.
pub fn evaluate(
    observation: &WeatherObservation,
    tier: CertificationTier,
) -> Result<SafetyEvaluation, EvaluationError> {
    evaluate_with_runway(observation, tier, DEFAULT_RUNWAY_HEADING)
}

/// Classifies one observation against the tier's minimums. Pure: no I/O,
/// no mutation, deterministic for a given input.
pub fn evaluate_with_runway(
    observation: &WeatherObservation,
    tier: CertificationTier,
    runway_heading: f64,
) -> Result<SafetyEvaluation, EvaluationError> {
    observation.validate()?;

    let minimums = minimums_for(tier);
    let visibility_sm = observation.visibility_sm();
    let crosswind_kt = crosswind_component(
        observation.wind_speed_kt,
        observation.wind_direction_deg,
        runway_heading,
    );

    let mut hazards = Vec::new();
    if observation.thunderstorm {
        hazards.push("active thunderstorm in the vicinity".to_string());
    }
    if observation.icing_reported {
        hazards.push("icing conditions reported".to_string());
    }
    if icing_likely(observation) {
        hazards.push(format!(
            "icing conditions likely: {:.1}C with {}",
            observation.temperature_c,
            if observation.precipitation {
                "active precipitation"
            } else {
                "high humidity"
            },
        ));
    }

    let mut violations = Vec::new();
    if visibility_sm < minimums.min_visibility_sm {
        violations.push(format!(
            "visibility {:.1} sm below minimum {:.1} sm",
            visibility_sm, minimums.min_visibility_sm,
        ));
    }
    if let Some(ceiling) = observation.cloud_ceiling_ft {
        if ceiling < minimums.min_ceiling_ft {
            violations.push(format!(
                "ceiling {:.0} ft below minimum {:.0} ft",
                ceiling, minimums.min_ceiling_ft,
            ));
        }
    }
    if !minimums.imc_allowed && implied_imc(visibility_sm, observation.cloud_ceiling_ft) {
        violations.push(format!(
            "instrument conditions (visibility < {:.0} sm or ceiling < {:.0} ft) not permitted for {}",
            IMC_VISIBILITY_SM, IMC_CEILING_FT, tier,
        ));
    }
    if observation.wind_speed_kt > minimums.max_wind_kt {
        violations.push(format!(
            "wind speed {:.0} kt exceeds maximum {:.0} kt",
            observation.wind_speed_kt, minimums.max_wind_kt,
        ));
    }
    if let Some(gust) = observation.wind_gust_kt {
        if gust > minimums.max_gust_kt {
            violations.push(format!(
                "wind gust {:.0} kt exceeds maximum {:.0} kt",
                gust, minimums.max_gust_kt,
            ));
        }
    }
    if crosswind_kt > minimums.max_crosswind_kt {
        violations.push(format!(
            "crosswind component {:.1} kt exceeds maximum {:.1} kt",
            crosswind_kt, minimums.max_crosswind_kt,
        ));
    }

    let is_safe = hazards.is_empty() && violations.is_empty();
    let measured = MeasuredConditions {
        temperature_c: observation.temperature_c,
        visibility_sm,
        ceiling_ft: observation.cloud_ceiling_ft,
        wind_speed_kt: observation.wind_speed_kt,
        wind_gust_kt: observation.wind_gust_kt,
        crosswind_kt,
    };
    let reasoning = if is_safe {
        safe_reasoning(&measured, &minimums)
    } else {
        unsafe_reasoning(tier, &hazards, &violations)
    };

    Ok(SafetyEvaluation {
        is_safe,
        hazards,
        violations,
        reasoning,
        minimums,
        measured,
        evaluated_at: Utc::now(),
    })
}

/// Wind component perpendicular to the runway, with the wind/runway angle
/// normalized into [0, 180] degrees.
fn crosswind_component(wind_speed_kt: f64, wind_direction_deg: f64, runway_heading: f64) -> f64 {
    let mut angle = (wind_direction_deg - runway_heading).abs() % 360.0;
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    (wind_speed_kt * angle.to_radians().sin()).abs()
}

fn icing_likely(observation: &WeatherObservation) -> bool {
    let in_band = observation.temperature_c >= ICING_TEMP_MIN_C
        && observation.temperature_c <= ICING_TEMP_MAX_C;
    let moisture = observation.humidity_percent > ICING_HUMIDITY_PCT || observation.precipitation;
    in_band && moisture
}

fn implied_imc(visibility_sm: f64, ceiling_ft: Option<f64>) -> bool {
    visibility_sm < IMC_VISIBILITY_SM || ceiling_ft.is_some_and(|c| c < IMC_CEILING_FT)
}

fn safe_reasoning(measured: &MeasuredConditions, minimums: &aeris_domain::SafetyMinimums) -> String {
    let ceiling = match measured.ceiling_ft {
        Some(c) => format!("{:.0} ft (min {:.0})", c, minimums.min_ceiling_ft),
        None => "unlimited".to_string(),
    };
    let gust = match measured.wind_gust_kt {
        Some(g) => format!("{:.0} kt (max {:.0})", g, minimums.max_gust_kt),
        None => "none reported".to_string(),
    };
    format!(
        "All measured values within {} minimums: visibility {:.1} sm (min {:.1}), ceiling {}, wind {:.0} kt (max {:.0}), gust {}, crosswind {:.1} kt (max {:.1}).",
        minimums.tier,
        measured.visibility_sm,
        minimums.min_visibility_sm,
        ceiling,
        measured.wind_speed_kt,
        minimums.max_wind_kt,
        gust,
        measured.crosswind_kt,
        minimums.max_crosswind_kt,
    )
}

fn unsafe_reasoning(tier: CertificationTier, hazards: &[String], violations: &[String]) -> String {
    let reasons: Vec<&str> = hazards
        .iter()
        .chain(violations.iter())
        .map(String::as_str)
        .collect();
    format!("Unsafe for {} operations: {}.", tier, reasons.join("; "))
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid weather observation: {0}")]
    InvalidObservation(#[from] ObservationError),
}
