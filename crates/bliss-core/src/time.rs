//! Calendar keys and timestamps.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};

/// Calendar day key in `"Tue Jan 01 2030"` form.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Key for the current local calendar day.
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

/// Current UTC timestamp, ISO-8601 with millisecond precision.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 / ISO-8601 timestamp into UTC.
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
