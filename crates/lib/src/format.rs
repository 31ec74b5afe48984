use crate::{coerce::parse_date, Amount};

/// Formats an amount for the printed sheet: Indian digit grouping
/// (`12,34,567`), at most three decimals, no trailing zeros.
///
/// An overflowed amount is shown as `inf`/`NaN`, the same text the batch
/// writer produces.
pub fn format_number(value: Amount) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scaled = value * 1000.0;
    let rounded = if scaled.is_finite() {
        scaled.round() / 1000.0
    } else {
        value
    };
    if rounded == 0.0 {
        return "0".to_string();
    }

    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + 6);
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

// last three digits, then pairs
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `DD/MM/YYYY`, or empty when the date doesn't parse.
pub fn format_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}
