use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Utc;

use crate::{
    domain::{
        conversation::{Conversation, MessageSummary},
        message::Message,
        user::{Role, UserSummary},
    },
    usecases::{
        contracts::{DashboardOrchestrator, PollScheduler},
        dashboard::DefaultDashboardOrchestrator,
        list_conversations::{ConversationsSource, ConversationsSourceError},
        load_messages::{MessagesSource, MessagesSourceError},
        mark_read::{ReadMarker, ReadSourceError},
        messaging_sync::MessagingSync,
        send_message::{MessageSender, SendMessageSourceError},
    },
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn user(id: &str, full_name: &str) -> UserSummary {
    UserSummary {
        id: id.to_owned(),
        full_name: full_name.to_owned(),
        business_name: None,
        avatar: None,
        role: Role::User,
        phone: None,
        last_active_at: None,
    }
}

pub fn conversation(peer_id: &str, full_name: &str, unread_count: u32) -> Conversation {
    Conversation {
        user: user(peer_id, full_name),
        last_message: None,
        unread_count,
    }
}

pub fn message(id: &str, sender_id: &str, content: &str) -> Message {
    Message {
        id: id.to_owned(),
        sender_id: sender_id.to_owned(),
        receiver_id: None,
        content: content.to_owned(),
        created_at: Utc::now(),
    }
}

#[derive(Default)]
struct FakeServer {
    conversations: Vec<Conversation>,
    threads: HashMap<String, Vec<Message>>,
    calls: Vec<String>,
    fail_conversations: bool,
    fail_messages: bool,
    fail_send: bool,
    next_id: u64,
}

/// In-memory stand-in for the messaging API. Sending appends to the thread,
/// updates the row preview and moves the row to the top; read-all zeroes
/// the unread count.
pub struct FakeBackend {
    me: String,
    server: Mutex<FakeServer>,
}

impl FakeBackend {
    pub fn new(me: &str, conversations: Vec<Conversation>) -> Self {
        Self {
            me: me.to_owned(),
            server: Mutex::new(FakeServer {
                conversations,
                ..FakeServer::default()
            }),
        }
    }

    pub fn with_thread(self, peer_id: &str, messages: Vec<Message>) -> Self {
        self.server()
            .threads
            .insert(peer_id.to_owned(), messages);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.server().calls.clone()
    }

    pub fn fail_conversations(&self, fail: bool) {
        self.server().fail_conversations = fail;
    }

    pub fn fail_messages(&self, fail: bool) {
        self.server().fail_messages = fail;
    }

    pub fn fail_send(&self, fail: bool) {
        self.server().fail_send = fail;
    }

    fn server(&self) -> MutexGuard<'_, FakeServer> {
        self.server.lock().expect("fake server lock")
    }
}

impl ConversationsSource for FakeBackend {
    fn list_conversations(&self) -> Result<Vec<Conversation>, ConversationsSourceError> {
        let mut server = self.server();
        server.calls.push("list_conversations".to_owned());
        if server.fail_conversations {
            return Err(ConversationsSourceError::Unavailable);
        }
        Ok(server.conversations.clone())
    }
}

impl MessagesSource for FakeBackend {
    fn list_messages(&self, peer_id: &str) -> Result<Vec<Message>, MessagesSourceError> {
        let mut server = self.server();
        server.calls.push(format!("list_messages:{peer_id}"));
        if server.fail_messages {
            return Err(MessagesSourceError::Unavailable);
        }
        Ok(server.threads.get(peer_id).cloned().unwrap_or_default())
    }
}

impl ReadMarker for FakeBackend {
    fn mark_all_read(&self, peer_id: &str) -> Result<(), ReadSourceError> {
        let mut server = self.server();
        server.calls.push(format!("mark_all_read:{peer_id}"));
        match server
            .conversations
            .iter_mut()
            .find(|row| row.peer_id() == peer_id)
        {
            Some(row) => {
                row.unread_count = 0;
                Ok(())
            }
            None => Err(ReadSourceError::NotFound),
        }
    }

    fn mark_message_read(&self, message_id: &str) -> Result<(), ReadSourceError> {
        self.server()
            .calls
            .push(format!("mark_message_read:{message_id}"));
        Ok(())
    }
}

impl MessageSender for FakeBackend {
    fn send_message(&self, receiver_id: &str, content: &str) -> Result<(), SendMessageSourceError> {
        let mut server = self.server();
        server.calls.push(format!("send:{receiver_id}:{content}"));
        if server.fail_send {
            return Err(SendMessageSourceError::Unavailable);
        }

        let Some(position) = server
            .conversations
            .iter()
            .position(|row| row.peer_id() == receiver_id)
        else {
            return Err(SendMessageSourceError::PeerNotFound);
        };

        server.next_id += 1;
        let sent = Message {
            id: format!("sent-{}", server.next_id),
            sender_id: self.me.clone(),
            receiver_id: Some(receiver_id.to_owned()),
            content: content.to_owned(),
            created_at: Utc::now(),
        };

        let mut row = server.conversations.remove(position);
        row.last_message = Some(MessageSummary {
            id: Some(sent.id.clone()),
            sender_id: Some(sent.sender_id.clone()),
            content: sent.content.clone(),
            created_at: sent.created_at,
        });
        server.conversations.insert(0, row);
        server
            .threads
            .entry(receiver_id.to_owned())
            .or_default()
            .push(sent);

        Ok(())
    }
}

/// Scheduler that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingScheduler {
    log: Arc<Mutex<Vec<String>>>,
    active: Option<String>,
}

impl RecordingScheduler {
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }
}

impl PollScheduler for RecordingScheduler {
    fn start(&mut self, peer_id: &str) {
        self.log
            .lock()
            .expect("scheduler log lock")
            .push(format!("start:{peer_id}"));
        self.active = Some(peer_id.to_owned());
    }

    fn stop(&mut self) {
        self.log
            .lock()
            .expect("scheduler log lock")
            .push("stop".to_owned());
        self.active = None;
    }

    fn active_peer(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

/// Dashboard over `backend` with a recording scheduler, already started.
pub fn started_dashboard(backend: FakeBackend) -> DefaultDashboardOrchestrator<FakeBackend> {
    let (_events, receiver) = std::sync::mpsc::channel();
    let sync = MessagingSync::new(
        Arc::new(backend),
        "me",
        Box::new(RecordingScheduler::default()),
        receiver,
    );
    let mut dashboard = DefaultDashboardOrchestrator::new(sync, 3);
    dashboard.start();
    dashboard
        .run_pending_work()
        .expect("initial load should run");
    dashboard
}
