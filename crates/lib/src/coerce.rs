//! Lenient conversions from form text into the values the ledger works on.
//!
//! Nothing in here fails: a patti is often filled in piece by piece, so a
//! half typed amount reads as zero and a half typed date as "not given".

use crate::Amount;
use chrono::{DateTime, NaiveDate};

pub const REMARKS_MAX_CHARS: usize = 200;
pub const ELLIPSIS: char = '…';

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Reads an amount the way a clerk types it: grouping commas, currency
/// symbols and units are dropped, only digits, `-` and `.` are kept.
pub fn parse_amount(raw: &str) -> Amount {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();

    match cleaned.parse::<Amount>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Whole days from `from` to `to`, `None` when either date is missing.
pub fn days_between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<i64> {
    Some((to? - from?).num_days())
}

/// Rounds to cents, halves away from zero.
pub fn round2(value: Amount) -> Amount {
    (value * 100.0).round() / 100.0
}

pub fn normalize_remarks(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= REMARKS_MAX_CHARS {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(REMARKS_MAX_CHARS).collect();
    truncated.push(ELLIPSIS);
    truncated
}
