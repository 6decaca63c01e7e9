use super::conversation::Conversation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationListUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

/// View state of the conversation list.
///
/// The list keeps the server order. `cursor` indexes the *visible* rows (after
/// the search filter), `active_peer_id` is the thread currently open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationListState {
    ui_state: ConversationListUiState,
    conversations: Vec<Conversation>,
    search_term: String,
    cursor: Option<usize>,
    active_peer_id: Option<String>,
}

impl Default for ConversationListState {
    fn default() -> Self {
        Self {
            ui_state: ConversationListUiState::Loading,
            conversations: Vec::new(),
            search_term: String::new(),
            cursor: None,
            active_peer_id: None,
        }
    }
}

impl ConversationListState {
    pub fn ui_state(&self) -> ConversationListUiState {
        self.ui_state.clone()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn has_data(&self) -> bool {
        !self.conversations.is_empty()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Rows matching the current search term, in server order.
    pub fn visible(&self) -> Vec<&Conversation> {
        self.conversations
            .iter()
            .filter(|conversation| conversation.matches_search(&self.search_term))
            .collect()
    }

    pub fn find(&self, peer_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.peer_id() == peer_id)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn cursor_conversation(&self) -> Option<&Conversation> {
        self.cursor
            .and_then(|index| self.visible().get(index).copied())
    }

    pub fn active_peer_id(&self) -> Option<&str> {
        self.active_peer_id.as_deref()
    }

    /// Marks a foreground load. Existing rows stay so a failed reload can
    /// fall back to them.
    pub fn set_loading(&mut self) {
        self.ui_state = ConversationListUiState::Loading;
    }

    pub fn set_ready(&mut self, conversations: Vec<Conversation>) {
        if conversations.is_empty() {
            self.set_empty();
            return;
        }

        let previous_cursor_peer = self
            .cursor_conversation()
            .map(|conversation| conversation.peer_id().to_owned());

        self.ui_state = ConversationListUiState::Ready;
        self.conversations = conversations;

        // The open thread is being read, so its badge stays at zero.
        if let Some(peer_id) = self.active_peer_id.clone() {
            self.mark_read(&peer_id);
        }

        self.cursor = self.resolve_cursor(previous_cursor_peer.as_deref());
    }

    pub fn set_empty(&mut self) {
        self.ui_state = ConversationListUiState::Empty;
        self.conversations.clear();
        self.cursor = None;
    }

    pub fn set_error(&mut self) {
        self.ui_state = ConversationListUiState::Error;
        self.conversations.clear();
        self.cursor = None;
    }

    /// Restores the ready/empty state after a failed foreground reload that
    /// kept its previous rows.
    pub fn restore_after_failed_reload(&mut self) {
        self.ui_state = if self.conversations.is_empty() {
            ConversationListUiState::Empty
        } else {
            ConversationListUiState::Ready
        };
    }

    pub fn set_search_term(&mut self, term: &str) {
        let previous_cursor_peer = self
            .cursor_conversation()
            .map(|conversation| conversation.peer_id().to_owned());

        self.search_term = term.to_owned();
        self.cursor = self.resolve_cursor(previous_cursor_peer.as_deref());
    }

    pub fn clear_search(&mut self) {
        self.set_search_term("");
    }

    pub fn set_active_peer(&mut self, peer_id: Option<&str>) {
        self.active_peer_id = peer_id.map(str::to_owned);
    }

    pub fn mark_read(&mut self, peer_id: &str) {
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.peer_id() == peer_id)
        {
            conversation.unread_count = 0;
        }
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.cursor else {
            return;
        };

        let last_index = self.visible().len().saturating_sub(1);
        self.cursor = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.cursor else {
            return;
        };

        self.cursor = Some(index.saturating_sub(1));
    }

    fn resolve_cursor(&self, previous_peer_id: Option<&str>) -> Option<usize> {
        let visible = self.visible();
        if visible.is_empty() {
            return None;
        }

        previous_peer_id
            .and_then(|peer_id| {
                visible
                    .iter()
                    .position(|conversation| conversation.peer_id() == peer_id)
            })
            .or(Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::conversation;

    #[test]
    fn default_state_is_loading_without_cursor() {
        let state = ConversationListState::default();

        assert_eq!(state.ui_state(), ConversationListUiState::Loading);
        assert!(state.conversations().is_empty());
        assert_eq!(state.cursor(), None);
    }

    #[test]
    fn set_ready_with_data_selects_first_row() {
        let mut state = ConversationListState::default();

        state.set_ready(vec![conversation("1", "Lan", 0), conversation("2", "Mai", 1)]);

        assert_eq!(state.ui_state(), ConversationListUiState::Ready);
        assert_eq!(state.cursor(), Some(0));
        assert_eq!(
            state.cursor_conversation().map(|row| row.peer_id()),
            Some("1")
        );
    }

    #[test]
    fn set_ready_with_empty_list_transitions_to_empty_state() {
        let mut state = ConversationListState::default();

        state.set_ready(vec![]);

        assert_eq!(state.ui_state(), ConversationListUiState::Empty);
        assert_eq!(state.cursor(), None);
    }

    #[test]
    fn set_loading_keeps_previous_rows() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![conversation("1", "Lan", 0)]);

        state.set_loading();

        assert_eq!(state.ui_state(), ConversationListUiState::Loading);
        assert_eq!(state.conversations().len(), 1);

        state.restore_after_failed_reload();
        assert_eq!(state.ui_state(), ConversationListUiState::Ready);
    }

    #[test]
    fn set_error_clears_rows_and_cursor() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![conversation("1", "Lan", 0)]);

        state.set_error();

        assert_eq!(state.ui_state(), ConversationListUiState::Error);
        assert!(state.conversations().is_empty());
        assert_eq!(state.cursor(), None);
    }

    #[test]
    fn cursor_moves_within_visible_bounds() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![conversation("1", "Lan", 0), conversation("2", "Mai", 0)]);

        state.select_next();
        state.select_next();
        assert_eq!(state.cursor(), Some(1));

        state.select_previous();
        state.select_previous();
        assert_eq!(state.cursor(), Some(0));
    }

    #[test]
    fn refresh_keeps_cursor_on_same_peer_after_reorder() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![
            conversation("1", "Lan", 0),
            conversation("2", "Mai", 0),
            conversation("3", "Hoa", 0),
        ]);
        state.select_next();

        state.set_ready(vec![
            conversation("2", "Mai", 0),
            conversation("1", "Lan", 0),
            conversation("3", "Hoa", 0),
        ]);

        assert_eq!(state.cursor(), Some(0));
        assert_eq!(
            state.cursor_conversation().map(|row| row.peer_id()),
            Some("2")
        );
    }

    #[test]
    fn filter_round_trip_restores_full_list() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![
            conversation("1", "Lan Nguyen", 0),
            conversation("2", "Mai Tran", 0),
        ]);

        state.set_search_term("tra");
        let filtered: Vec<&str> = state.visible().iter().map(|row| row.peer_id()).collect();
        assert_eq!(filtered, vec!["2"]);
        assert_eq!(state.cursor(), Some(0));

        state.clear_search();
        assert_eq!(state.visible().len(), 2);
    }

    #[test]
    fn filter_without_matches_has_no_cursor() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![conversation("1", "Lan", 0)]);

        state.set_search_term("zzz");

        assert!(state.visible().is_empty());
        assert_eq!(state.cursor(), None);
        assert_eq!(state.cursor_conversation(), None);
    }

    #[test]
    fn open_thread_badge_stays_zero_across_refreshes() {
        let mut state = ConversationListState::default();
        state.set_active_peer(Some("2"));

        state.set_ready(vec![conversation("1", "Lan", 4), conversation("2", "Mai", 3)]);

        assert_eq!(state.find("1").map(|row| row.unread_count), Some(4));
        assert_eq!(state.find("2").map(|row| row.unread_count), Some(0));
    }

    #[test]
    fn mark_read_zeroes_only_that_peer() {
        let mut state = ConversationListState::default();
        state.set_ready(vec![conversation("1", "Lan", 4), conversation("2", "Mai", 3)]);

        state.mark_read("1");

        assert_eq!(state.find("1").map(|row| row.unread_count), Some(0));
        assert_eq!(state.find("2").map(|row| row.unread_count), Some(3));
    }
}
