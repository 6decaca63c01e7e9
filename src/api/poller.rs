use std::{
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
        Arc,
    },
    thread,
    time::Duration,
};

use crate::{
    domain::events::{PollTarget, SyncEvent},
    usecases::{
        contracts::PollScheduler,
        list_conversations::{list_conversations, ListConversationsQuery},
        load_messages::{load_messages, LoadMessagesQuery},
        messaging_sync::MessagingBackend,
    },
};

const POLLER_SPAWN_FAILED: &str = "POLLER_SPAWN_FAILED";

struct ActivePoller {
    peer_id: String,
    stop_tx: Sender<()>,
}

/// Runs the open thread's refresh loop on a worker thread.
///
/// Each tick re-fetches the thread, then the conversation list, and sends
/// the results as `SyncEvent`s. Stopping signals the worker and returns at
/// once; a fetch already in flight finishes but its result is dropped.
pub struct ThreadPollScheduler<B: MessagingBackend + 'static> {
    backend: Arc<B>,
    events: Sender<SyncEvent>,
    interval: Duration,
    active: Option<ActivePoller>,
}

impl<B: MessagingBackend + 'static> ThreadPollScheduler<B> {
    pub fn new(backend: Arc<B>, events: Sender<SyncEvent>, interval: Duration) -> Self {
        Self {
            backend,
            events,
            interval,
            active: None,
        }
    }
}

impl<B: MessagingBackend + 'static> PollScheduler for ThreadPollScheduler<B> {
    fn start(&mut self, peer_id: &str) {
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let interval = self.interval;
        let worker_peer = peer_id.to_owned();

        let spawned = thread::Builder::new()
            .name("pdesk-poller".to_owned())
            .spawn(move || run_poller(backend.as_ref(), &worker_peer, interval, &events, &stop_rx));

        match spawned {
            Ok(_) => {
                tracing::debug!(peer_id, "thread poller started");
                self.active = Some(ActivePoller {
                    peer_id: peer_id.to_owned(),
                    stop_tx,
                });
            }
            Err(error) => tracing::warn!(
                code = POLLER_SPAWN_FAILED,
                peer_id,
                error = %error,
                "thread poller could not be started"
            ),
        }
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.stop_tx.send(());
            tracing::debug!(peer_id = %active.peer_id, "thread poller stopped");
        }
    }

    fn active_peer(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.peer_id.as_str())
    }
}

impl<B: MessagingBackend + 'static> Drop for ThreadPollScheduler<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_poller<B: MessagingBackend>(
    backend: &B,
    peer_id: &str,
    interval: Duration,
    events: &Sender<SyncEvent>,
    stop_rx: &Receiver<()>,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let thread_event = match load_messages(backend, LoadMessagesQuery::new(peer_id)) {
            Ok(output) => SyncEvent::ThreadRefreshed {
                peer_id: output.peer_id,
                messages: output.messages,
            },
            Err(_) => SyncEvent::PollFailed {
                peer_id: peer_id.to_owned(),
                target: PollTarget::Thread,
            },
        };
        if !forward(events, stop_rx, thread_event) {
            return;
        }

        let list_event = match list_conversations(backend, ListConversationsQuery::default()) {
            Ok(output) => SyncEvent::ConversationsRefreshed(output.conversations),
            Err(_) => SyncEvent::PollFailed {
                peer_id: peer_id.to_owned(),
                target: PollTarget::Conversations,
            },
        };
        if !forward(events, stop_rx, list_event) {
            return;
        }
    }
}

/// Sends `event` unless a stop arrived while it was being fetched. Returns
/// false once the worker should exit.
fn forward(events: &Sender<SyncEvent>, stop_rx: &Receiver<()>, event: SyncEvent) -> bool {
    match stop_rx.try_recv() {
        Err(TryRecvError::Empty) => events.send(event).is_ok(),
        Ok(()) | Err(TryRecvError::Disconnected) => false,
    }
}
