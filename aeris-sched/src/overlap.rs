use aeris_domain::TimeSlot;

/// Filters the first resource's slots down to those simultaneously workable
/// for all three resources: a slot from `a` survives only if it overlaps at
/// least one slot in `b` AND at least one slot in `c`. Any empty input
/// short-circuits to an empty result.
///
/// This is a candidate filter, not an interval merge: surviving slots keep
/// their original `a` boundaries, which is sound because all resource grids
/// share the same quantization.
pub fn intersect(a: &[TimeSlot], b: &[TimeSlot], c: &[TimeSlot]) -> Vec<TimeSlot> {
    if a.is_empty() || b.is_empty() || c.is_empty() {
        return Vec::new();
    }
    a.iter()
        .filter(|slot| {
            b.iter().any(|other| slot.overlaps(other)) && c.iter().any(|other| slot.overlaps(other))
        })
        .copied()
        .collect()
}

/// Raised when the three resources share no workable slot at all, so the
/// caller can say "no alternative times" instead of a generic failure.
#[derive(Debug, thiserror::Error)]
#[error("no overlapping availability across trainee, instructor, and aircraft")]
pub struct NoCommonAvailability;
