//! Use case for sending a message to a peer.
//!
//! This module provides the `MessageSender` trait, the `send_message`
//! function for text messages and `attachment_command` for the
//! file-as-placeholder flow.

use std::path::Path;

use crate::domain::{kyc::file_name_of, message::attachment_placeholder};

/// Command to send a message to a specific peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    /// Peer of the open thread; `None` when nothing is selected.
    pub receiver_id: Option<String>,
    pub content: String,
}

/// Errors that can occur at the source level (REST API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageSourceError {
    /// Session token was refused.
    Unauthorized,
    /// Receiver does not exist.
    PeerNotFound,
    /// Server refused the message with its own explanation.
    Rejected(String),
    /// Service is temporarily unavailable.
    Unavailable,
}

/// Domain-level errors for the send operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
    /// No conversation is selected.
    NoRecipient,
    /// The attached file does not exist.
    AttachmentMissing(String),
    Unauthorized,
    PeerNotFound,
    Rejected(String),
    TemporarilyUnavailable,
}

/// Trait for delivering messages to peers.
pub trait MessageSender {
    /// Sends `content` to `receiver_id`.
    ///
    /// # Errors
    /// Returns `SendMessageSourceError` if the message could not be sent.
    fn send_message(&self, receiver_id: &str, content: &str) -> Result<(), SendMessageSourceError>;
}

impl<T: MessageSender + ?Sized> MessageSender for &T {
    fn send_message(&self, receiver_id: &str, content: &str) -> Result<(), SendMessageSourceError> {
        (*self).send_message(receiver_id, content)
    }
}

/// Sends a message to the selected peer.
///
/// Validation runs before any network call: blank text is
/// `EmptyMessage`, a missing receiver is `NoRecipient`.
///
/// # Errors
/// Maps source errors to domain errors for other failure cases.
pub fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    let (receiver_id, content) = validate(&command)?;

    sender
        .send_message(receiver_id, content)
        .map_err(map_source_error)
}

/// Checks `command` without sending it and returns the trimmed receiver and
/// content.
///
/// # Errors
/// `EmptyMessage` for blank text, `NoRecipient` without a receiver.
pub fn validate(command: &SendMessageCommand) -> Result<(&str, &str), SendMessageError> {
    let content = command.content.trim();
    if content.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    let receiver_id = command
        .receiver_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(SendMessageError::NoRecipient)?;

    Ok((receiver_id, content))
}

/// Builds the command that stands in for an attached file: the message text
/// is the file name behind a fixed prefix; the file itself is never uploaded.
///
/// # Errors
/// Returns `SendMessageError::AttachmentMissing` if `path` is not a file.
pub fn attachment_command(
    receiver_id: Option<String>,
    path: &Path,
) -> Result<SendMessageCommand, SendMessageError> {
    if !path.is_file() {
        return Err(SendMessageError::AttachmentMissing(
            path.display().to_string(),
        ));
    }

    Ok(SendMessageCommand {
        receiver_id,
        content: attachment_placeholder(&file_name_of(path)),
    })
}

fn map_source_error(error: SendMessageSourceError) -> SendMessageError {
    match error {
        SendMessageSourceError::Unauthorized => SendMessageError::Unauthorized,
        SendMessageSourceError::PeerNotFound => SendMessageError::PeerNotFound,
        SendMessageSourceError::Rejected(message) => SendMessageError::Rejected(message),
        SendMessageSourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
    }
}
