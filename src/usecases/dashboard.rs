use std::path::Path;

use anyhow::Result;

use crate::domain::{
    conversation_list_state::ConversationListState,
    dashboard_state::{ActivePane, DashboardState},
    events::{AppEvent, KeyInput},
    input_state::TextInputState,
    notice::Notice,
    thread_state::ThreadState,
    user::UserSummary,
};

use super::{
    contracts::DashboardOrchestrator,
    messaging_sync::{LoadMode, MessagingBackend, MessagingSync, SyncError},
    send_message::SendMessageCommand,
};

/// Composer command that sends a file-name placeholder instead of text.
const ATTACH_COMMAND: &str = "/attach ";

/// Network work queued by a key press, run after the next draw.
#[derive(Debug)]
enum PendingWork {
    LoadConversations,
    OpenThread(UserSummary),
    Send(SendMessageCommand),
    Refresh,
}

pub struct DefaultDashboardOrchestrator<B: MessagingBackend> {
    state: DashboardState,
    sync: MessagingSync<B>,
    pending: Option<PendingWork>,
    notice_ttl_ticks: u32,
}

impl<B: MessagingBackend> DefaultDashboardOrchestrator<B> {
    pub fn new(sync: MessagingSync<B>, notice_ttl_ticks: u32) -> Self {
        Self {
            state: DashboardState::default(),
            sync,
            pending: None,
            notice_ttl_ticks,
        }
    }

    /// Queues the initial foreground load of the conversation list.
    pub fn start(&mut self) {
        self.sync.conversations_mut().set_loading();
        self.pending = Some(PendingWork::LoadConversations);
    }

    fn report(&mut self, error: &SyncError) {
        self.state
            .push_notice(Notice::error(error.to_string(), self.notice_ttl_ticks));
    }

    fn info(&mut self, text: impl Into<String>) {
        self.state
            .push_notice(Notice::info(text, self.notice_ttl_ticks));
    }

    fn quit(&mut self) {
        self.pending = None;
        self.sync.shutdown();
        self.state.stop();
    }

    fn handle_key(&mut self, key: KeyInput) {
        if key.ctrl && key.key == "c" {
            self.quit();
            return;
        }

        match self.state.active_pane() {
            ActivePane::Conversations => self.handle_list_key(&key),
            ActivePane::Thread => self.handle_thread_key(&key),
            ActivePane::Search => self.handle_search_key(&key),
            ActivePane::Composer => self.handle_composer_key(&key),
        }
    }

    fn handle_list_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.sync.conversations_mut().select_next(),
            "k" | "up" => self.sync.conversations_mut().select_previous(),
            "enter" => self.open_cursor_conversation(),
            "tab" if self.sync.thread().is_open() => {
                self.state.set_active_pane(ActivePane::Thread);
            }
            _ => self.handle_common_key(key),
        }
    }

    fn handle_thread_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.sync.thread_mut().select_next(),
            "k" | "up" => self.sync.thread_mut().select_previous(),
            "esc" | "tab" => self.state.set_active_pane(ActivePane::Conversations),
            "m" => self.mark_selected_message_read(),
            _ => self.handle_common_key(key),
        }
    }

    fn handle_common_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "q" => self.quit(),
            "/" => self.state.set_active_pane(ActivePane::Search),
            "i" => {
                if self.sync.thread().is_open() {
                    self.state.set_active_pane(ActivePane::Composer);
                } else {
                    self.info("open a conversation first");
                }
            }
            "r" => {
                self.sync.conversations_mut().set_loading();
                self.pending = Some(PendingWork::Refresh);
            }
            "x" => {
                self.sync.close_thread();
                self.state.composer_mut().clear();
                self.state.set_active_pane(ActivePane::Conversations);
            }
            _ => {}
        }
    }

    /// Enter keeps the filter, Esc drops it.
    fn handle_search_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "enter" => self.state.set_active_pane(ActivePane::Conversations),
            "esc" => {
                self.state.search_mut().clear();
                self.sync.conversations_mut().clear_search();
                self.state.set_active_pane(ActivePane::Conversations);
            }
            _ => {
                if edit_input(self.state.search_mut(), key) {
                    let term = self.state.search().text().to_owned();
                    self.sync.conversations_mut().set_search_term(&term);
                }
            }
        }
    }

    fn handle_composer_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "enter" => self.submit_composer(),
            "esc" => self.state.set_active_pane(ActivePane::Thread),
            _ => {
                edit_input(self.state.composer_mut(), key);
            }
        }
    }

    fn open_cursor_conversation(&mut self) {
        let Some(peer) = self
            .sync
            .conversations()
            .cursor_conversation()
            .map(|row| row.user.clone())
        else {
            return;
        };

        self.sync.begin_open(&peer);
        self.state.set_active_pane(ActivePane::Thread);
        self.pending = Some(PendingWork::OpenThread(peer));
    }

    /// The composer is cleared on submit and not restored when sending fails.
    fn submit_composer(&mut self) {
        let text = self.state.composer_mut().take();

        let prepared = match text.strip_prefix(ATTACH_COMMAND) {
            Some(path) => self.sync.prepare_attachment(Path::new(path.trim())),
            None => self.sync.prepare_send(&text),
        };

        match prepared {
            Ok(command) => self.pending = Some(PendingWork::Send(command)),
            Err(error) => self.report(&error),
        }
    }

    fn refresh(&mut self) -> Result<(), SyncError> {
        self.sync.load_conversations(LoadMode::Foreground)?;

        if self.sync.thread().is_open() {
            self.sync.refresh_thread()?;
        }

        Ok(())
    }

    fn mark_selected_message_read(&mut self) {
        let thread = self.sync.thread();
        let Some(message_id) = thread
            .selected_index()
            .and_then(|index| thread.messages().get(index))
            .map(|message| message.id.clone())
        else {
            return;
        };

        match self.sync.mark_message_read(&message_id) {
            Ok(()) => self.info("message marked as read"),
            Err(error) => self.report(&error),
        }
    }
}

/// Applies an editing key to `input`. Returns true when the text changed.
fn edit_input(input: &mut TextInputState, key: &KeyInput) -> bool {
    if let Some(ch) = key.as_char() {
        return input.insert(ch);
    }

    match key.key.as_str() {
        "backspace" => input.backspace(),
        "delete" => input.delete(),
        "left" => {
            input.move_left();
            return false;
        }
        "right" => {
            input.move_right();
            return false;
        }
        "home" => {
            input.move_home();
            return false;
        }
        "end" => {
            input.move_end();
            return false;
        }
        _ => return false,
    }

    true
}

impl<B: MessagingBackend> DashboardOrchestrator for DefaultDashboardOrchestrator<B> {
    fn state(&self) -> &DashboardState {
        &self.state
    }

    fn conversations(&self) -> &ConversationListState {
        self.sync.conversations()
    }

    fn thread(&self) -> &ThreadState {
        self.sync.thread()
    }

    fn thread_mut(&mut self) -> &mut ThreadState {
        self.sync.thread_mut()
    }

    fn current_user_id(&self) -> &str {
        self.sync.current_user_id()
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {
                self.sync.pump_events();
                self.state.expire_notices();
            }
            AppEvent::QuitRequested => self.quit(),
            AppEvent::InputKey(key) => self.handle_key(key),
        }

        Ok(())
    }

    fn has_pending_work(&self) -> bool {
        self.pending.is_some()
    }

    fn run_pending_work(&mut self) -> Result<()> {
        let Some(work) = self.pending.take() else {
            return Ok(());
        };

        let result = match work {
            PendingWork::LoadConversations => self.sync.load_conversations(LoadMode::Foreground),
            PendingWork::OpenThread(peer) => self.sync.select_conversation(peer),
            PendingWork::Send(command) => self.sync.deliver(command),
            PendingWork::Refresh => self.refresh(),
        };

        if let Err(error) = result {
            self.report(&error);
        }

        Ok(())
    }
}
