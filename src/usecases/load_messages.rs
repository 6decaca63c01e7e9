use crate::domain::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesQuery {
    pub peer_id: String,
}

impl LoadMessagesQuery {
    pub fn new(peer_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesOutput {
    pub peer_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagesSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
    PeerNotFound,
}

/// Full-history thread fetch. There is no paging: every call returns the
/// whole conversation with the peer, oldest first.
pub trait MessagesSource {
    fn list_messages(&self, peer_id: &str) -> Result<Vec<Message>, MessagesSourceError>;
}

impl<T> MessagesSource for &T
where
    T: MessagesSource + ?Sized,
{
    fn list_messages(&self, peer_id: &str) -> Result<Vec<Message>, MessagesSourceError> {
        (*self).list_messages(peer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMessagesError {
    InvalidPeer,
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
    PeerNotFound,
}

pub fn load_messages(
    source: &dyn MessagesSource,
    query: LoadMessagesQuery,
) -> Result<LoadMessagesOutput, LoadMessagesError> {
    let peer_id = query.peer_id.trim();
    if peer_id.is_empty() {
        return Err(LoadMessagesError::InvalidPeer);
    }

    let messages = source.list_messages(peer_id).map_err(map_source_error)?;

    Ok(LoadMessagesOutput {
        peer_id: peer_id.to_owned(),
        messages,
    })
}

fn map_source_error(error: MessagesSourceError) -> LoadMessagesError {
    match error {
        MessagesSourceError::Unauthorized => LoadMessagesError::Unauthorized,
        MessagesSourceError::Unavailable => LoadMessagesError::TemporarilyUnavailable,
        MessagesSourceError::InvalidData => LoadMessagesError::DataContractViolation,
        MessagesSourceError::PeerNotFound => LoadMessagesError::PeerNotFound,
    }
}
