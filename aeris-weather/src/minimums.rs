use aeris_domain::{CertificationTier, SafetyMinimums};

/// Canonical weather minimums, one record per tier. Limits only loosen as
/// the tier gains capability; `minimums_monotonic` below guards the table.
pub fn minimums_for(tier: CertificationTier) -> SafetyMinimums {
    match tier {
        CertificationTier::Student => SafetyMinimums {
            tier,
            min_visibility_sm: 5.0,
            min_ceiling_ft: 3000.0,
            max_wind_kt: 10.0,
            max_gust_kt: 15.0,
            max_crosswind_kt: 5.0,
            imc_allowed: false,
        },
        CertificationTier::Private => SafetyMinimums {
            tier,
            min_visibility_sm: 3.0,
            min_ceiling_ft: 2000.0,
            max_wind_kt: 15.0,
            max_gust_kt: 20.0,
            max_crosswind_kt: 8.0,
            imc_allowed: false,
        },
        CertificationTier::Instrument => SafetyMinimums {
            tier,
            min_visibility_sm: 1.0,
            min_ceiling_ft: 500.0,
            max_wind_kt: 20.0,
            max_gust_kt: 25.0,
            max_crosswind_kt: 12.0,
            imc_allowed: true,
        },
        CertificationTier::Commercial => SafetyMinimums {
            tier,
            min_visibility_sm: 0.5,
            min_ceiling_ft: 200.0,
            max_wind_kt: 25.0,
            max_gust_kt: 30.0,
            max_crosswind_kt: 15.0,
            imc_allowed: true,
        },
    }
}

/// True when `looser` permits everything `stricter` permits.
pub fn is_looser_or_equal(looser: &SafetyMinimums, stricter: &SafetyMinimums) -> bool {
    looser.min_visibility_sm <= stricter.min_visibility_sm
        && looser.min_ceiling_ft <= stricter.min_ceiling_ft
        && looser.max_wind_kt >= stricter.max_wind_kt
        && looser.max_gust_kt >= stricter.max_gust_kt
        && looser.max_crosswind_kt >= stricter.max_crosswind_kt
        && (looser.imc_allowed || !stricter.imc_allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimums_monotonic() {
        for pair in CertificationTier::ALL.windows(2) {
            let lower = minimums_for(pair[0]);
            let higher = minimums_for(pair[1]);
            assert!(
                is_looser_or_equal(&higher, &lower),
                "{} minimums must be equal-or-looser than {}",
                pair[1],
                pair[0],
            );
        }
    }

    #[test]
    fn one_record_per_tier() {
        for tier in CertificationTier::ALL {
            assert_eq!(minimums_for(tier).tier, tier);
        }
    }

    #[test]
    fn entry_tier_caps_wind_at_ten() {
        assert_eq!(minimums_for(CertificationTier::Student).max_wind_kt, 10.0);
    }
}
