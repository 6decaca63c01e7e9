//! Read receipts: whole conversation or a single message.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadSourceError {
    Unauthorized,
    NotFound,
    Unavailable,
}

pub trait ReadMarker {
    /// Marks every message received from `peer_id` as read.
    fn mark_all_read(&self, peer_id: &str) -> Result<(), ReadSourceError>;
    fn mark_message_read(&self, message_id: &str) -> Result<(), ReadSourceError>;
}

impl<T: ReadMarker + ?Sized> ReadMarker for &T {
    fn mark_all_read(&self, peer_id: &str) -> Result<(), ReadSourceError> {
        (*self).mark_all_read(peer_id)
    }

    fn mark_message_read(&self, message_id: &str) -> Result<(), ReadSourceError> {
        (*self).mark_message_read(message_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkReadError {
    InvalidId,
    Unauthorized,
    NotFound,
    TemporarilyUnavailable,
}

pub fn mark_conversation_read(marker: &dyn ReadMarker, peer_id: &str) -> Result<(), MarkReadError> {
    let peer_id = non_blank(peer_id)?;
    marker.mark_all_read(peer_id).map_err(map_source_error)
}

pub fn mark_message_read(marker: &dyn ReadMarker, message_id: &str) -> Result<(), MarkReadError> {
    let message_id = non_blank(message_id)?;
    marker
        .mark_message_read(message_id)
        .map_err(map_source_error)
}

fn non_blank(id: &str) -> Result<&str, MarkReadError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(MarkReadError::InvalidId);
    }
    Ok(id)
}

fn map_source_error(error: ReadSourceError) -> MarkReadError {
    match error {
        ReadSourceError::Unauthorized => MarkReadError::Unauthorized,
        ReadSourceError::NotFound => MarkReadError::NotFound,
        ReadSourceError::Unavailable => MarkReadError::TemporarilyUnavailable,
    }
}
