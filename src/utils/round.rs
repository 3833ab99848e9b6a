//! Fixed-precision rounding shared by the classifiers and report rows.
//!
//! Distances are compared and reported at a resolution of 1e-5 (four
//! significant digits once expressed as a percentage). The truncation here is
//! what makes 0.030001 and 0.030002 "the same distance" for tie-block
//! detection, so every consumer must go through these helpers rather than
//! compare raw floats.

/// Reciprocal of the resolution distances are accurate to.
const ACCURATE_TO: f64 = 100_000.0;

fn to_fixed(d: f64) -> i64 {
    (d * ACCURATE_TO) as i64
}

/// Truncate a fraction to the supported resolution.
#[must_use]
pub fn round_off(d: f64) -> f64 {
    to_fixed(d) as f64 / ACCURATE_TO
}

/// Are two distances indistinguishable at the supported resolution?
///
/// This is the tie predicate used for tie-block detection: both values are
/// scaled by 1e5 and truncated, and the fixed-point representations compared.
#[must_use]
pub fn distances_tied(d1: f64, d2: f64) -> bool {
    to_fixed(d1) == to_fixed(d2)
}

/// `x / y` as a percentage, truncated to two decimal places.
///
/// A share of nothing is zero percent.
#[must_use]
pub fn percentage(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        return 0.0;
    }
    (round_off(x / y) * 10_000.0) as i64 as f64 / 100.0
}
