use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{id, user::UserSummary};

/// Preview of the newest message in a conversation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    #[serde(default, deserialize_with = "id::deserialize_opt")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "id::deserialize_opt")]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the conversation list, keyed by the peer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub user: UserSummary,
    #[serde(default)]
    pub last_message: Option<MessageSummary>,
    #[serde(default)]
    pub unread_count: u32,
}

impl Conversation {
    pub fn peer_id(&self) -> &str {
        &self.user.id
    }

    pub fn display_name(&self) -> &str {
        self.user.display_name()
    }

    /// Case-insensitive substring match against the resolved display name.
    /// A blank term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.display_name().to_lowercase().contains(&needle)
    }
}
