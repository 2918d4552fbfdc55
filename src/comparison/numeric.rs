//! Tie-aware comparison of two optional measurements.

use crate::comparison::models::Superiority;

/// Relative difference (percent of the mean) below which two values are equal.
pub const EQUAL_THRESHOLD_PERCENT: f64 = 5.0;

/// Decides which side wins on a single measurement.
///
/// Returns `None` when either value is unknown and `Equal` when the values are
/// within [`EQUAL_THRESHOLD_PERCENT`] of their mean, whatever the direction.
/// Two values whose sum is zero are treated as equal rather than dividing by
/// zero.
pub fn compare_values(a: Option<f64>, b: Option<f64>, higher_is_better: bool) -> Superiority {
    let (Some(a), Some(b)) = (a, b) else {
        return Superiority::None;
    };
    if !a.is_finite() || !b.is_finite() {
        return Superiority::None;
    }

    if a == b {
        return Superiority::Equal;
    }

    let mean = (a + b) / 2.0;
    if mean == 0.0 {
        return Superiority::Equal;
    }

    let percent_diff = (a - b).abs() / mean * 100.0;
    if percent_diff < EQUAL_THRESHOLD_PERCENT {
        return Superiority::Equal;
    }

    let a_wins = if higher_is_better { a > b } else { a < b };
    if a_wins {
        Superiority::A
    } else {
        Superiority::B
    }
}
