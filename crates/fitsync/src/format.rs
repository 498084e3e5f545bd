//! Display formatting and rounding helpers
//!
//! Pure functions converting raw numeric and label fields into the display
//! values written to the workspace database. No state, no I/O; functions
//! that depend on a wall-clock zone take it as an explicit parameter.

use chrono::{LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Training-effect message prefixes mapped to their display band, checked
/// in declared order.
const TRAINING_MESSAGE_BANDS: &[(&str, &str)] = &[
    ("NO_", "No Benefit"),
    ("MINOR_", "Some Benefit"),
    ("RECOVERY_", "Recovery"),
    ("MAINTAINING_", "Maintaining"),
    ("IMPROVING_", "Impacting"),
    ("IMPACTING_", "Impacting"),
    ("HIGHLY_", "Highly Impacting"),
    ("OVERREACHING_", "Overreaching"),
];

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an average speed in m/s as a `M:SS min/km` pace string.
///
/// Speeds at or below zero (stationary activities) produce an empty string.
pub fn format_pace(average_speed: f64) -> String {
    if average_speed > 0.0 {
        let pace_min_km = 1000.0 / (average_speed * 60.0);
        let minutes = pace_min_km as u32;
        let seconds = ((pace_min_km - f64::from(minutes)) * 60.0) as u32;
        format!("{}:{:02} min/km", minutes, seconds)
    } else {
        String::new()
    }
}

/// Format a duration in seconds as an `XhYYm` band string
pub fn format_duration(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{}h{:02}m", hours, minutes)
}

/// Map a raw training-effect message code to its display band.
///
/// Unrecognized messages pass through unchanged.
pub fn format_training_message(message: &str) -> String {
    for (prefix, band) in TRAINING_MESSAGE_BANDS {
        if message.starts_with(prefix) {
            return (*band).to_string();
        }
    }
    message.to_string()
}

/// Format a training-effect label: underscores to spaces, title case
pub fn format_training_effect(label: &str) -> String {
    title_case(&label.replace('_', " "))
}

/// Uppercase the first letter of each whitespace-separated word, lowercase
/// the rest
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an epoch-milliseconds timestamp as a local `HH:MM` clock string
pub fn format_clock(epoch_ms: i64, tz: Tz) -> Option<String> {
    match Utc.timestamp_millis_opt(epoch_ms) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&tz).format("%H:%M").to_string()),
        _ => None,
    }
}

/// Format an epoch-milliseconds timestamp as a local RFC 3339 timestamp
pub fn format_timestamp(epoch_ms: i64, tz: Tz) -> Option<String> {
    match Utc.timestamp_millis_opt(epoch_ms) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&tz).to_rfc3339()),
        _ => None,
    }
}

/// Format a calendar date as the `DD.MM.YYYY` record title
pub fn format_date_title(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
