use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id;

/// Prefix of the textual stand-in sent when a file is attached.
pub const ATTACHMENT_PREFIX: &str = "[Image] ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "id::deserialize")]
    pub sender_id: String,
    #[serde(default, deserialize_with = "id::deserialize_opt")]
    pub receiver_id: Option<String>,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A message is "own" when the authenticated account sent it.
    pub fn is_own(&self, current_user_id: &str) -> bool {
        self.sender_id == current_user_id
    }

    /// File name carried by an attachment placeholder, if this is one.
    pub fn attachment_name(&self) -> Option<&str> {
        self.content
            .strip_prefix(ATTACHMENT_PREFIX)
            .filter(|name| !name.is_empty())
    }
}

/// Builds the placeholder text sent instead of the file content.
pub fn attachment_placeholder(file_name: &str) -> String {
    format!("{ATTACHMENT_PREFIX}{file_name}")
}
