//! Display formatting for amounts and timestamps, German locale.
//!
//! Output matches what `Intl` produces for `de-DE` in the web front-end:
//! `1.234,56 €` with a non-breaking space before the symbol, and dates
//! such as `27. Juni 2025`.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

const NBSP: char = '\u{a0}';

const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// `1234.5, "EUR"` → `1.234,50 €`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let integer = group_thousands(cents / 100);
    let symbol = match currency.to_ascii_uppercase().as_str() {
        "EUR" => "€".to_string(),
        "USD" => "$".to_string(),
        "GBP" => "£".to_string(),
        other => other.to_string(),
    };
    format!("{sign}{integer},{:02}{NBSP}{symbol}", cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `27. Juni 2025`.
pub fn format_date<D: Datelike>(date: &D) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{}. {month} {}", date.day(), date.year())
}

/// Age of `then` relative to `now`, falling back to the date after a week.
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Gerade eben".to_string()
    } else if minutes < 60 {
        format!("vor {minutes} Minuten")
    } else if hours < 24 {
        format!("vor {hours} Stunden")
    } else if days < 7 {
        format!("vor {days} Tagen")
    } else {
        format_date(&then)
    }
}

/// Parse a backend timestamp: RFC 3339, or an ISO datetime without offset
/// (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
