use super::{message::Message, user::UserSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Scroll margin - number of rows kept visible above/below the cursor.
const SCROLL_MARGIN: usize = 5;

/// View state of the open message thread. Identity is the peer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadState {
    peer: Option<UserSummary>,
    messages: Vec<Message>,
    ui_state: ThreadUiState,
    sending: bool,
    selected_index: Option<usize>,
    scroll_offset: usize,
}

impl Default for ThreadState {
    fn default() -> Self {
        Self {
            peer: None,
            messages: Vec::new(),
            ui_state: ThreadUiState::Empty,
            sending: false,
            selected_index: None,
            scroll_offset: 0,
        }
    }
}

impl ThreadState {
    pub fn peer(&self) -> Option<&UserSummary> {
        self.peer.as_ref()
    }

    pub fn peer_id(&self) -> Option<&str> {
        self.peer.as_ref().map(|peer| peer.id.as_str())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ui_state(&self) -> ThreadUiState {
        self.ui_state.clone()
    }

    pub fn is_open(&self) -> bool {
        self.peer.is_some()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Opens a thread for `peer`, dropping whatever the previous peer showed.
    pub fn set_loading(&mut self, peer: UserSummary) {
        self.peer = Some(peer);
        self.messages.clear();
        self.ui_state = ThreadUiState::Loading;
        self.sending = false;
        self.selected_index = None;
        self.scroll_offset = 0;
    }

    /// Replaces the history with a fresh full fetch for `peer_id`.
    ///
    /// Returns `false` and leaves the state untouched when `peer_id` is not the
    /// open thread; a late response for a previous peer must never render.
    pub fn set_ready(&mut self, peer_id: &str, messages: Vec<Message>) -> bool {
        if self.peer_id() != Some(peer_id) {
            return false;
        }

        let follow_tail = match self.selected_index {
            None => true,
            Some(index) => index + 1 >= self.messages.len(),
        };

        self.selected_index = if messages.is_empty() {
            None
        } else if follow_tail {
            Some(messages.len() - 1)
        } else {
            self.selected_index
                .map(|index| index.min(messages.len() - 1))
        };
        self.messages = messages;
        self.ui_state = ThreadUiState::Ready;
        true
    }

    pub fn set_error(&mut self) {
        if self.is_open() {
            self.ui_state = ThreadUiState::Error;
        }
    }

    pub fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
    }

    pub fn clear(&mut self) {
        self.peer = None;
        self.messages.clear();
        self.ui_state = ThreadUiState::Empty;
        self.sending = false;
        self.selected_index = None;
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }

        self.selected_index = match self.selected_index {
            None => Some(0),
            Some(idx) if idx + 1 < self.messages.len() => Some(idx + 1),
            Some(idx) => Some(idx),
        };
    }

    pub fn select_previous(&mut self) {
        if self.messages.is_empty() {
            return;
        }

        self.selected_index = match self.selected_index {
            None => Some(self.messages.len() - 1),
            Some(0) => Some(0),
            Some(idx) => Some(idx - 1),
        };
    }

    /// Keeps the cursor row visible with `SCROLL_MARGIN` rows around it.
    pub fn update_scroll_offset(&mut self, element_index: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        let effective_margin = SCROLL_MARGIN.min(viewport_height / 2);

        if element_index < self.scroll_offset + effective_margin {
            self.scroll_offset = element_index.saturating_sub(effective_margin);
        }

        let visible_bottom = self.scroll_offset + viewport_height;
        if element_index + effective_margin >= visible_bottom {
            self.scroll_offset =
                (element_index + effective_margin + 1).saturating_sub(viewport_height);
        }
    }
}
