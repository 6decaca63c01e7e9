use serde::{Deserialize, Serialize};

use super::user::SessionUser;

/// Bearer token plus the profile blob it belongs to. This pair is what the
/// local session store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}
