//! Best-of-attempts derivation

use crate::registry::Directionality;

/// Pick the representative value from a sequence of raw attempts.
///
/// Null, zero and non-finite entries are placeholders for attempts that were
/// never taken and do not count. Returns None when no valid attempt exists.
pub fn compute_best(attempts: &[Option<f64>], directionality: Directionality) -> Option<f64> {
    let valid = attempts
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite() && *v != 0.0);

    match directionality {
        Directionality::HigherIsBetter => valid.reduce(f64::max),
        Directionality::LowerIsBetter => valid.reduce(f64::min),
    }
}
