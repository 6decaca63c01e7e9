use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{id, user::UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Provider-side transitions the backend accepts from this status.
    pub fn allows(self, action: BookingAction) -> bool {
        matches!(
            (self, action),
            (Self::Pending, BookingAction::Accept)
                | (Self::Pending, BookingAction::Reject)
                | (Self::Confirmed, BookingAction::CheckIn)
                | (Self::CheckedIn, BookingAction::Complete)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CHECKED_IN" | "CHECKEDIN" => Ok(Self::CheckedIn),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Accept,
    Reject,
    CheckIn,
    Complete,
}

impl BookingAction {
    /// Last path segment of the transition endpoint.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::CheckIn => "checkin",
            Self::Complete => "complete",
        }
    }
}

impl FromStr for BookingAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "").replace('_', "").as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "checkin" => Ok(Self::CheckIn),
            "complete" => Ok(Self::Complete),
            other => Err(format!("unknown booking action: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub customer: Option<UserSummary>,
    #[serde(default)]
    pub service: Option<ServiceRef>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Customer ratings are whole stars from 1 to 5.
pub fn is_valid_rating(rating: u8) -> bool {
    (1..=5).contains(&rating)
}
