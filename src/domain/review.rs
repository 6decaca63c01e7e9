use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{id, user::UserSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub customer: Option<UserSummary>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn has_reply(&self) -> bool {
        self.reply
            .as_deref()
            .is_some_and(|reply| !reply.trim().is_empty())
    }

    /// Star strip like "★★★☆☆".
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}
