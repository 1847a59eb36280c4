//! Rounding helpers shared by every metric.
//!
//! Percentages round half away from zero. They are computed in integer
//! arithmetic so `1/8` is exactly 12.5 before rounding and always yields 13.

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
#[must_use]
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    let rounded = (part * 200 + whole) / (whole * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Rounds to one decimal place, half away from zero.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
