//! Presentation helpers for quote text and timestamps.

use chrono::{DateTime, Utc};

/// Whole minutes needed to read `text`, rounded up. Never below one.
pub fn reading_time_minutes(text: &str, words_per_minute: usize) -> usize {
    let words = text.split_whitespace().count().max(1);
    words.div_ceil(words_per_minute.max(1))
}

/// Shorten to at most `max_len` characters, ending in `suffix` when cut.
pub fn truncate_text(text: &str, max_len: usize, suffix: &str) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

const INTERVALS: &[(&str, i64)] = &[
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// "3 days ago", "1 hour ago", or "just now".
pub fn relative_time(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - past).num_seconds();
    for (label, secs) in INTERVALS {
        let count = elapsed / secs;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{count} {label}{plural} ago");
        }
    }
    "just now".to_string()
}
