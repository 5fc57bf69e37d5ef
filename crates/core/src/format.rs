//! Display formatting shared by chart points, tables and metric cards.
//!
//! All date/time helpers render in UTC with English month abbreviations.

use chrono::{DateTime, Utc};

/// Insert `sep` between every group of three digits, counting from the right.
fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Two decimals with a space as thousands separator: `1234567.891` → `"1 234 567.89"`.
#[must_use]
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, dec) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let body = format!("{}.{dec}", group_thousands(int, ' '));
    if value < 0.0 && fixed != "0.00" {
        format!("-{body}")
    } else {
        body
    }
}

/// Dollar amount with the sign in front of the currency symbol: `-12.5` → `"-$12.50"`.
#[must_use]
pub fn format_money(value: f64) -> String {
    let body = format_number(value.abs());
    if value < 0.0 && body != "0.00" {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Whole dollars, floored, comma separated; `--` when the value is missing.
///
/// Used by the metric cards (TVL, volume).
#[must_use]
pub fn format_money_floor(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let floored = v.floor();
            let digits = format!("{:.0}", floored.abs());
            let sign = if floored < 0.0 { "-" } else { "" };
            format!("${sign}{}", group_thousands(&digits, ','))
        }
        _ => "--".to_string(),
    }
}

/// `"05 Jun"`
#[must_use]
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%d %b").to_string()
}

/// `"05 Jun 2025"`
#[must_use]
pub fn format_date_with_year(instant: DateTime<Utc>) -> String {
    instant.format("%d %b %Y").to_string()
}

/// `"14:05"`
#[must_use]
pub fn format_time_24h(instant: DateTime<Utc>) -> String {
    instant.format("%H:%M").to_string()
}

/// `"2:05 PM"`
#[must_use]
pub fn format_time_12h(instant: DateTime<Utc>) -> String {
    instant.format("%-I:%M %p").to_string()
}

/// Convert a 24-hour `"HH:mm"` clock string to `"h:mm AM/PM"`.
/// Returns `None` for anything that is not a valid clock time.
#[must_use]
pub fn format_clock_12h(clock: &str) -> Option<String> {
    let (h, m) = clock.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let period = if hours >= 12 { "PM" } else { "AM" };
    let hours12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    Some(format!("{hours12}:{minutes:02} {period}"))
}

