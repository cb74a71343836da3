//! Number and date formatting for display.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::Number;

/// Compact a number for display (e.g., 1500 -> "1.5K", 2500000 -> "2.5M").
///
/// The quotient is rounded to tenths from its exact `f64` value with ties
/// going up, so 1250 is "1.3K" while 1150 (stored as 1.1499...) is "1.1K".
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{}M", one_decimal(n, 1_000_000))
    } else if n >= 1_000 {
        format!("{}K", one_decimal(n, 1_000))
    } else {
        n.to_string()
    }
}

fn one_decimal(n: u64, unit: u64) -> String {
    let tenths = round_tenths(n as f64 / unit as f64);
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// `round(10 * x)` for a finite `x >= 1`, ties up, computed on the exact
/// binary value of `x`.
fn round_tenths(x: f64) -> u128 {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = u128::from((bits & ((1u64 << 52) - 1)) | (1u64 << 52));
    // x == mantissa * 2^exp
    let exp = biased - 1075;
    if exp >= 0 {
        (mantissa * 10) << exp
    } else {
        let shift = exp.unsigned_abs();
        (mantissa * 10 + (1u128 << (shift - 1))) >> shift
    }
}

/// Render a JSON number as a browser would show it: `42.0` is "42",
/// `42.37` stays "42.37".
pub fn format_json_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Group digits in threes with commas (e.g., 1234567 -> "1,234,567").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Long US date with a 12-hour clock, e.g. `January 5, 2024, 03:07 PM`.
pub fn format_datetime<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y, %I:%M %p").to_string()
}

/// Parse a date and format it in local time.
///
/// Accepts RFC 3339, a naive ISO timestamp (taken as UTC) or Unix
/// milliseconds. Returns `None` when the input matches none of them.
pub fn format_date(input: &str) -> Option<String> {
    parse_date(input).map(|utc| format_datetime(&utc.with_timezone(&Local)))
}

pub(crate) fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    input
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}
