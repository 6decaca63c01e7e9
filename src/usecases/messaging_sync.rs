//! Conversation and thread synchronization.
//!
//! `MessagingSync` owns the local view of the conversation list and of the
//! open thread. It never merges: every refresh replaces the previous snapshot
//! with what the server returned, and the last response wins. While a thread
//! is open a single background poller re-fetches it; results arrive as
//! `SyncEvent`s and are applied by `pump_events`.

use std::{
    path::Path,
    sync::{
        mpsc::{Receiver, TryRecvError},
        Arc,
    },
};

use crate::domain::{
    conversation_list_state::ConversationListState,
    events::{PollTarget, SyncEvent},
    thread_state::ThreadState,
    user::UserSummary,
};

use super::{
    contracts::PollScheduler,
    list_conversations::{
        list_conversations, ConversationsSource, ListConversationsError, ListConversationsQuery,
    },
    load_messages::{load_messages, LoadMessagesError, LoadMessagesQuery, MessagesSource},
    mark_read::{mark_conversation_read, mark_message_read, MarkReadError, ReadMarker},
    send_message::{
        attachment_command, send_message, validate, MessageSender, SendMessageCommand,
        SendMessageError,
    },
};

const SYNC_BACKGROUND_REFRESH_FAILED: &str = "SYNC_BACKGROUND_REFRESH_FAILED";
const SYNC_MARK_READ_FAILED: &str = "SYNC_MARK_READ_FAILED";
const SYNC_POLL_FAILED: &str = "SYNC_POLL_FAILED";

/// Everything the synchronizer needs from the remote side.
pub trait MessagingBackend:
    ConversationsSource + MessagesSource + ReadMarker + MessageSender + Send + Sync
{
}

impl<T> MessagingBackend for T where
    T: ConversationsSource + MessagesSource + ReadMarker + MessageSender + Send + Sync
{
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Shows the loading state and reports failures to the caller.
    Foreground,
    /// Silent refresh: failures are logged and the previous data stays.
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("no conversation selected")]
    NoRecipient,
    #[error("file not found: {0}")]
    AttachmentMissing(String),
    #[error("session expired, run `pdesk login`")]
    Unauthorized,
    #[error("conversation not found")]
    NotFound,
    #[error("message rejected: {0}")]
    Rejected(String),
    #[error("server is temporarily unavailable")]
    TemporarilyUnavailable,
    #[error("unexpected response from server")]
    DataContractViolation,
}

impl From<ListConversationsError> for SyncError {
    fn from(error: ListConversationsError) -> Self {
        match error {
            ListConversationsError::Unauthorized => Self::Unauthorized,
            ListConversationsError::TemporarilyUnavailable => Self::TemporarilyUnavailable,
            ListConversationsError::DataContractViolation => Self::DataContractViolation,
        }
    }
}

impl From<LoadMessagesError> for SyncError {
    fn from(error: LoadMessagesError) -> Self {
        match error {
            LoadMessagesError::InvalidPeer => Self::NoRecipient,
            LoadMessagesError::Unauthorized => Self::Unauthorized,
            LoadMessagesError::TemporarilyUnavailable => Self::TemporarilyUnavailable,
            LoadMessagesError::DataContractViolation => Self::DataContractViolation,
            LoadMessagesError::PeerNotFound => Self::NotFound,
        }
    }
}

impl From<SendMessageError> for SyncError {
    fn from(error: SendMessageError) -> Self {
        match error {
            SendMessageError::EmptyMessage => Self::EmptyMessage,
            SendMessageError::NoRecipient => Self::NoRecipient,
            SendMessageError::AttachmentMissing(path) => Self::AttachmentMissing(path),
            SendMessageError::Unauthorized => Self::Unauthorized,
            SendMessageError::PeerNotFound => Self::NotFound,
            SendMessageError::Rejected(message) => Self::Rejected(message),
            SendMessageError::TemporarilyUnavailable => Self::TemporarilyUnavailable,
        }
    }
}

impl From<MarkReadError> for SyncError {
    fn from(error: MarkReadError) -> Self {
        match error {
            MarkReadError::InvalidId | MarkReadError::NotFound => Self::NotFound,
            MarkReadError::Unauthorized => Self::Unauthorized,
            MarkReadError::TemporarilyUnavailable => Self::TemporarilyUnavailable,
        }
    }
}

impl SyncError {
    /// Raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyMessage | Self::NoRecipient | Self::AttachmentMissing(_)
        )
    }
}

pub struct MessagingSync<B: MessagingBackend> {
    backend: Arc<B>,
    current_user_id: String,
    list: ConversationListState,
    thread: ThreadState,
    scheduler: Box<dyn PollScheduler>,
    events: Receiver<SyncEvent>,
}

impl<B: MessagingBackend> MessagingSync<B> {
    /// `events` must be the receiving end of the channel the scheduler's
    /// pollers send into.
    pub fn new(
        backend: Arc<B>,
        current_user_id: impl Into<String>,
        scheduler: Box<dyn PollScheduler>,
        events: Receiver<SyncEvent>,
    ) -> Self {
        Self {
            backend,
            current_user_id: current_user_id.into(),
            list: ConversationListState::default(),
            thread: ThreadState::default(),
            scheduler,
            events,
        }
    }

    pub fn conversations(&self) -> &ConversationListState {
        &self.list
    }

    pub fn conversations_mut(&mut self) -> &mut ConversationListState {
        &mut self.list
    }

    pub fn thread(&self) -> &ThreadState {
        &self.thread
    }

    pub fn thread_mut(&mut self) -> &mut ThreadState {
        &mut self.thread
    }

    pub fn current_user_id(&self) -> &str {
        &self.current_user_id
    }

    pub fn polling_peer(&self) -> Option<&str> {
        self.scheduler.active_peer()
    }

    pub fn load_conversations(&mut self, mode: LoadMode) -> Result<(), SyncError> {
        if mode == LoadMode::Foreground {
            self.list.set_loading();
        }

        match list_conversations(&*self.backend, ListConversationsQuery::default()) {
            Ok(output) => {
                self.list.set_ready(output.conversations);
                Ok(())
            }
            Err(error) => {
                let error = SyncError::from(error);
                match mode {
                    LoadMode::Background => {
                        tracing::warn!(
                            code = SYNC_BACKGROUND_REFRESH_FAILED,
                            error = %error,
                            "conversation refresh failed, keeping previous list"
                        );
                        Ok(())
                    }
                    LoadMode::Foreground => {
                        if self.list.has_data() {
                            self.list.restore_after_failed_reload();
                        } else {
                            self.list.set_error();
                        }
                        Err(error)
                    }
                }
            }
        }
    }

    /// Makes `peer` the open thread: fetch its history, mark it read, refresh
    /// the list and start polling it. Any previous poller is stopped first.
    ///
    /// When the history fetch fails the thread shows its error state, the
    /// read receipt is skipped and the poller still starts, so the next tick
    /// retries.
    pub fn select_conversation(&mut self, peer: UserSummary) -> Result<(), SyncError> {
        self.scheduler.stop();

        let peer_id = peer.id.clone();
        let fetched = self.open_thread(peer);

        if fetched.is_ok() {
            match mark_conversation_read(&*self.backend, &peer_id) {
                Ok(()) => self.list.mark_read(&peer_id),
                Err(error) => tracing::warn!(
                    code = SYNC_MARK_READ_FAILED,
                    peer_id = %peer_id,
                    error = ?error,
                    "mark-all-read failed"
                ),
            }
        }

        self.load_conversations(LoadMode::Background)?;
        self.scheduler.start(&peer_id);

        fetched
    }

    /// Replaces the thread with `peer`'s full history. Does not touch the
    /// poller or read receipts.
    pub fn open_thread(&mut self, peer: UserSummary) -> Result<(), SyncError> {
        let peer_id = peer.id.clone();
        self.list.set_active_peer(Some(peer.id.as_str()));
        self.thread.set_loading(peer);

        self.fetch_thread(&peer_id, LoadMode::Foreground)
    }

    pub fn refresh_thread(&mut self) -> Result<(), SyncError> {
        let Some(peer_id) = self.thread.peer_id().map(str::to_owned) else {
            return Err(SyncError::NoRecipient);
        };

        self.fetch_thread(&peer_id, LoadMode::Foreground)
    }

    /// Stops the current poller and shows `peer`'s thread as loading, ahead
    /// of `select_conversation`.
    pub fn begin_open(&mut self, peer: &UserSummary) {
        self.scheduler.stop();
        self.list.set_active_peer(Some(peer.id.as_str()));
        self.thread.set_loading(peer.clone());
    }

    pub fn close_thread(&mut self) {
        self.scheduler.stop();
        self.thread.clear();
        self.list.set_active_peer(None);
    }

    /// Sends `text` to the open thread, then re-fetches the thread and the
    /// list. The `sending` flag is set for the duration of the call.
    pub fn send_message(&mut self, text: &str) -> Result<(), SyncError> {
        let command = self.prepare_send(text)?;
        self.deliver(command)
    }

    /// Sends the `[Image] <file name>` placeholder for `path`.
    pub fn send_attachment(&mut self, path: &Path) -> Result<(), SyncError> {
        let command = self.prepare_attachment(path)?;
        self.deliver(command)
    }

    /// Validates `text` for the open thread and raises the `sending` flag.
    /// Nothing goes out until `deliver`.
    pub fn prepare_send(&mut self, text: &str) -> Result<SendMessageCommand, SyncError> {
        let command = SendMessageCommand {
            receiver_id: self.thread.peer_id().map(str::to_owned),
            content: text.to_owned(),
        };

        self.prepared(command)
    }

    pub fn prepare_attachment(&mut self, path: &Path) -> Result<SendMessageCommand, SyncError> {
        let command = attachment_command(self.thread.peer_id().map(str::to_owned), path)?;

        self.prepared(command)
    }

    pub fn mark_message_read(&mut self, message_id: &str) -> Result<(), SyncError> {
        mark_message_read(&*self.backend, message_id)?;
        Ok(())
    }

    /// Applies every poller result queued so far. Returns how many were
    /// taken off the channel.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;

        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.apply_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        applied
    }

    pub fn apply_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::ThreadRefreshed { peer_id, messages } => {
                if !self.thread.set_ready(&peer_id, messages) {
                    tracing::debug!(peer_id = %peer_id, "discarded thread refresh for a closed peer");
                }
            }
            SyncEvent::ConversationsRefreshed(conversations) => {
                self.list.set_ready(conversations);
            }
            SyncEvent::PollFailed { peer_id, target } => {
                let target = match target {
                    PollTarget::Thread => "thread",
                    PollTarget::Conversations => "conversations",
                };
                tracing::warn!(
                    code = SYNC_POLL_FAILED,
                    peer_id = %peer_id,
                    target,
                    "background poll failed, keeping last known state"
                );
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }

    fn prepared(&mut self, command: SendMessageCommand) -> Result<SendMessageCommand, SyncError> {
        validate(&command)?;
        self.thread.set_sending(true);
        Ok(command)
    }

    /// Sends a prepared command, then re-fetches the thread and the list.
    /// Clears the `sending` flag either way.
    pub fn deliver(&mut self, command: SendMessageCommand) -> Result<(), SyncError> {
        self.thread.set_sending(true);

        let receiver_id = command.receiver_id.clone();
        if let Err(error) = send_message(&*self.backend, command) {
            self.thread.set_sending(false);
            return Err(error.into());
        }

        if let Some(peer_id) = receiver_id {
            self.fetch_thread(&peer_id, LoadMode::Background)?;
        }
        self.load_conversations(LoadMode::Background)?;
        self.thread.set_sending(false);

        Ok(())
    }

    fn fetch_thread(&mut self, peer_id: &str, mode: LoadMode) -> Result<(), SyncError> {
        match load_messages(&*self.backend, LoadMessagesQuery::new(peer_id)) {
            Ok(output) => {
                self.thread.set_ready(&output.peer_id, output.messages);
                Ok(())
            }
            Err(error) => {
                let error = SyncError::from(error);
                match mode {
                    LoadMode::Background => {
                        tracing::warn!(
                            code = SYNC_BACKGROUND_REFRESH_FAILED,
                            peer_id,
                            error = %error,
                            "thread refresh failed, keeping previous messages"
                        );
                        Ok(())
                    }
                    LoadMode::Foreground => {
                        if self.thread.peer_id() == Some(peer_id) {
                            self.thread.set_error();
                        }
                        Err(error)
                    }
                }
            }
        }
    }
}
