use super::{conversation::Conversation, message::Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
}

/// Key press in a terminal-independent form: printable characters are sent
/// as themselves, named keys as lowercase names ("enter", "esc", "up", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// The typed character, when the key is a single printable char.
    pub fn as_char(&self) -> Option<char> {
        if self.ctrl {
            return None;
        }

        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    Thread,
    Conversations,
}

/// Results delivered by the background poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    ThreadRefreshed {
        peer_id: String,
        messages: Vec<Message>,
    },
    ConversationsRefreshed(Vec<Conversation>),
    PollFailed {
        peer_id: String,
        target: PollTarget,
    },
}
