//! Certainty Factor Arithmetic

/// Certainty with which a ticked symptom is assumed to be true
pub const USER_CERTAINTY: f64 = 0.8;

/// Combine two certainty factors supporting the same hypothesis.
///
/// `combine(a, b) = a + b * (1 - a)`. For `a, b` in `[0, 1]` the result stays
/// in `[0, 1]`, is at least `max(a, b)`, and the operator is commutative.
pub fn combine(a: f64, b: f64) -> f64 {
    a + b * (1.0 - a)
}

/// Fold `count` identical evidence terms into one certainty factor.
///
/// Returns `0.0` when there is no evidence and `evidence` for a single term.
/// Since every term is equal and [`combine`] is commutative, the order in
/// which matched symptoms are visited cannot change the result.
pub fn combine_repeated(evidence: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }

    (1..count).fold(evidence, |acc, _| combine(acc, evidence))
}

/// Convert a certainty factor to a whole percentage.
///
/// Rounds half away from zero, which for the non-negative values produced
/// here is the same as rounding half up.
pub fn to_percent(cf: f64) -> u8 {
    (cf * 100.0).round().clamp(0.0, 100.0) as u8
}
