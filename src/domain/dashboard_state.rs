use super::{
    input_state::TextInputState,
    notice::{Notice, NoticeLevel},
};

/// Which part of the dashboard receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePane {
    #[default]
    Conversations,
    Thread,
    Search,
    Composer,
}

impl ActivePane {
    pub fn is_text_input(self) -> bool {
        matches!(self, Self::Search | Self::Composer)
    }
}

/// UI-only state of the messaging dashboard. Conversation and thread data
/// live with the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    running: bool,
    active_pane: ActivePane,
    search: TextInputState,
    composer: TextInputState,
    notices: Vec<Notice>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            running: true,
            active_pane: ActivePane::default(),
            search: TextInputState::default(),
            composer: TextInputState::default(),
            notices: Vec::new(),
        }
    }
}

impl DashboardState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn active_pane(&self) -> ActivePane {
        self.active_pane
    }

    pub fn set_active_pane(&mut self, pane: ActivePane) {
        self.active_pane = pane;
    }

    pub fn search(&self) -> &TextInputState {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut TextInputState {
        &mut self.search
    }

    pub fn composer(&self) -> &TextInputState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut TextInputState {
        &mut self.composer
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Newest notice still alive, shown in the status line.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn has_error_notice(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| notice.level == NoticeLevel::Error)
    }

    pub fn expire_notices(&mut self) {
        self.notices.retain_mut(Notice::tick);
    }
}
