//! Amount normalization.

use super::patterns::NON_DIGIT;
use crate::models::report::Normalized;

/// Normalize a captured amount to an integer.
///
/// All non-digit characters are stripped, so grouping separators,
/// currency codes and signs are dropped. Missing, empty, digit-free or
/// overflowing input yields `0` flagged as a fallback.
pub fn normalize_amount(raw: Option<&str>) -> Normalized<i64> {
    let Some(raw) = raw else {
        return Normalized::fallback(0);
    };

    let digits = NON_DIGIT.replace_all(raw, "");
    if digits.is_empty() {
        return Normalized::fallback(0);
    }

    match digits.parse::<i64>() {
        Ok(value) => Normalized::exact(value),
        Err(_) => Normalized::fallback(0),
    }
}
