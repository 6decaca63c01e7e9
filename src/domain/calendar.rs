use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarEventKind {
    Booking,
    Blocked,
    #[default]
    #[serde(other)]
    Other,
}

/// Plain event object exchanged with the calendar widget and the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, alias = "type")]
    pub kind: CalendarEventKind,
}

/// Half-open time span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }
}

/// Body of the block-time call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTimeRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BlockTimeRequest {
    pub fn new(range: TimeRange, reason: Option<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            reason: reason.filter(|reason| !reason.trim().is_empty()),
        }
    }
}
