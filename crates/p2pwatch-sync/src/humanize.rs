//! Human-relative descriptions of elapsed time ("3 minutes ago").

use chrono::{DateTime, Utc};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Describe `timestamp` relative to `now`.
///
/// Past timestamps read "<span> ago", future ones "in <span>".
pub fn relative_to(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(timestamp).num_seconds();
    let span = describe(secs.unsigned_abs());
    if secs >= 0 {
        format!("{span} ago")
    } else {
        format!("in {span}")
    }
}

fn describe(secs: u64) -> String {
    match secs {
        s if s < 45 => "a few seconds".into(),
        s if s < 2 * MINUTE => "a minute".into(),
        s if s < 45 * MINUTE => format!("{} minutes", s / MINUTE),
        s if s < 2 * HOUR => "an hour".into(),
        s if s < 22 * HOUR => format!("{} hours", s / HOUR),
        s if s < 2 * DAY => "a day".into(),
        s if s < 26 * DAY => format!("{} days", s / DAY),
        s if s < 60 * DAY => "a month".into(),
        s if s < 320 * DAY => format!("{} months", s / (30 * DAY)),
        s if s < 730 * DAY => "a year".into(),
        s => format!("{} years", s / (365 * DAY)),
    }
}
