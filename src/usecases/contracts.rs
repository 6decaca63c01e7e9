use anyhow::Result;

use crate::domain::{
    conversation_list_state::ConversationListState, dashboard_state::DashboardState,
    events::AppEvent, thread_state::ThreadState,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait DashboardOrchestrator {
    fn state(&self) -> &DashboardState;
    fn conversations(&self) -> &ConversationListState;
    fn thread(&self) -> &ThreadState;
    fn thread_mut(&mut self) -> &mut ThreadState;
    fn current_user_id(&self) -> &str;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
    /// True when a key press queued a blocking call. The shell draws once
    /// before `run_pending_work` so loading and sending states are visible.
    fn has_pending_work(&self) -> bool;
    fn run_pending_work(&mut self) -> Result<()>;
}

/// Owner of the single background refresh loop for the open thread.
///
/// `start` always replaces a running loop; there is never more than one.
pub trait PollScheduler {
    fn start(&mut self, peer_id: &str);
    fn stop(&mut self);
    fn active_peer(&self) -> Option<&str>;
}

/// Failure reported by provider-side sources (bookings, catalog, reviews,
/// calendar, KYC, stats).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("session expired, run `pdesk login`")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("server is temporarily unavailable")]
    Unavailable,
    #[error("unexpected response from server")]
    InvalidData,
}
