//! Presence and timestamp labels.
//!
//! Everything here is pure: the current time is always passed in, which keeps
//! the boundaries testable. Timestamps in the future (server clock skew) count
//! as zero elapsed.

use chrono::{DateTime, Local, Utc};

/// A peer counts as online while its last activity is younger than this.
pub const ONLINE_WINDOW_SECS: i64 = 120;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1_440;

/// How presence is rendered once the last activity is a day or more old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceStyle {
    /// "active N days ago"
    #[default]
    Days,
    /// Falls back to the local calendar date.
    DateFallback,
}

pub fn is_online(last_active_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    last_active_at
        .map(|ts| elapsed_secs(ts, now) < ONLINE_WINDOW_SECS)
        .unwrap_or(false)
}

pub fn presence_label(
    last_active_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    style: PresenceStyle,
) -> String {
    let Some(ts) = last_active_at else {
        return "offline".to_owned();
    };

    let secs = elapsed_secs(ts, now);
    if secs < ONLINE_WINDOW_SECS {
        return "active now".to_owned();
    }

    let minutes = secs / 60;
    if minutes < MINUTES_PER_HOUR {
        return format!("active {} ago", plural(minutes, "minute"));
    }
    if minutes < MINUTES_PER_DAY {
        return format!("active {} ago", plural(minutes / MINUTES_PER_HOUR, "hour"));
    }

    match style {
        PresenceStyle::Days => format!("active {} ago", plural(minutes / MINUTES_PER_DAY, "day")),
        PresenceStyle::DateFallback => format!("active on {}", local_date(ts)),
    }
}

/// Recency label for conversation rows.
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = elapsed_secs(ts, now) / 60;

    if minutes < 1 {
        "just now".to_owned()
    } else if minutes < MINUTES_PER_HOUR {
        plural(minutes, "minute")
    } else if minutes < MINUTES_PER_DAY {
        plural(minutes / MINUTES_PER_HOUR, "hour")
    } else {
        local_date(ts)
    }
}

/// Absolute wall-clock time for thread rows.
pub fn message_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn local_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

fn elapsed_secs(ts: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - ts).num_seconds().max(0)
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
