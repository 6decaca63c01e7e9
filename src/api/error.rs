use crate::usecases::{
    contracts::RemoteError,
    list_conversations::ConversationsSourceError,
    load_messages::MessagesSourceError,
    mark_read::ReadSourceError,
    send_message::SendMessageSourceError,
    session_gate::{CredentialsSourceError, ProfileSourceError},
};

/// Outcome classes of a REST call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("not authorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    InvalidData(String),
    #[error("async runtime unavailable: {0}")]
    Runtime(String),
}

impl ApiError {
    /// Server-side failures (5xx) are reported like an unreachable server.
    fn is_server_fault(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if *status >= 500)
    }
}

impl From<ApiError> for RemoteError {
    fn from(error: ApiError) -> Self {
        if error.is_server_fault() {
            return Self::Unavailable;
        }

        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::NotFound => Self::NotFound,
            ApiError::Rejected { message, .. } => Self::Rejected(message),
            ApiError::Network(_) | ApiError::Runtime(_) => Self::Unavailable,
            ApiError::InvalidData(_) => Self::InvalidData,
        }
    }
}

impl From<ApiError> for ConversationsSourceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::InvalidData(_) => Self::InvalidData,
            _ => Self::Unavailable,
        }
    }
}

impl From<ApiError> for MessagesSourceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::NotFound => Self::PeerNotFound,
            ApiError::InvalidData(_) => Self::InvalidData,
            _ => Self::Unavailable,
        }
    }
}

impl From<ApiError> for ReadSourceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::NotFound => Self::NotFound,
            _ => Self::Unavailable,
        }
    }
}

impl From<ApiError> for SendMessageSourceError {
    fn from(error: ApiError) -> Self {
        if error.is_server_fault() {
            return Self::Unavailable;
        }

        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::NotFound => Self::PeerNotFound,
            ApiError::Rejected { message, .. } => Self::Rejected(message),
            _ => Self::Unavailable,
        }
    }
}

impl From<ApiError> for ProfileSourceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::InvalidData(_) => Self::InvalidData,
            _ => Self::Unavailable,
        }
    }
}

impl From<ApiError> for CredentialsSourceError {
    fn from(error: ApiError) -> Self {
        if error.is_server_fault() {
            return Self::Unavailable;
        }

        match error {
            ApiError::Unauthorized | ApiError::NotFound => Self::InvalidCredentials,
            ApiError::Rejected { message, .. } => Self::Rejected(message),
            ApiError::InvalidData(_) => Self::InvalidData,
            ApiError::Network(_) | ApiError::Runtime(_) => Self::Unavailable,
        }
    }
}
