//! Six-month request trend.
//!
//! Buckets are matched on month-of-year only; a request from the same month of
//! an earlier year lands in the current window.

use chrono::{Datelike, NaiveDate};
use salesdash_core::Prospect;

use crate::snapshot::MonthlyCount;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fév", "mar", "avr", "mai", "juin", "juil", "août", "sep", "oct", "nov", "déc",
];

/// Number of months in the window, current month included.
pub const TREND_MONTHS: u32 = 6;

/// Counts requests per month for the window ending at `today`'s month.
#[must_use]
pub fn monthly_trend(records: &[Prospect], today: NaiveDate) -> Vec<MonthlyCount> {
    let current = today.month0();
    let window: Vec<u32> = (0..TREND_MONTHS)
        .rev()
        .map(|back| (current + 12 - back) % 12)
        .collect();

    let mut counts = vec![0usize; window.len()];
    for date in records.iter().filter_map(|r| r.request_date) {
        if let Some(idx) = window.iter().position(|m| *m == date.month0()) {
            counts[idx] += 1;
        }
    }

    window
        .into_iter()
        .zip(counts)
        .map(|(month0, count)| MonthlyCount {
            month: MONTH_ABBREVIATIONS[month0 as usize].to_string(),
            count,
        })
        .collect()
}
