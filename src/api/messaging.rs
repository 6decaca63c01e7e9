//! Messaging and session endpoints.

use reqwest::Method;
use serde::Serialize;

use crate::{
    domain::{conversation::Conversation, message::Message, session::Session, user::SessionUser},
    usecases::{
        list_conversations::{ConversationsSource, ConversationsSourceError},
        load_messages::{MessagesSource, MessagesSourceError},
        mark_read::{ReadMarker, ReadSourceError},
        send_message::{MessageSender, SendMessageSourceError},
        session_gate::{
            CredentialsSource, CredentialsSourceError, ProfileSource, ProfileSourceError,
        },
    },
};

use super::{client::HttpApi, path_segment};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    receiver_id: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl ConversationsSource for HttpApi {
    fn list_conversations(&self) -> Result<Vec<Conversation>, ConversationsSourceError> {
        Ok(self.fetch(self.request(Method::GET, "/messages/conversations"))?)
    }
}

impl MessagesSource for HttpApi {
    fn list_messages(&self, peer_id: &str) -> Result<Vec<Message>, MessagesSourceError> {
        let path = format!("/messages/conversation/{}", path_segment(peer_id));
        Ok(self.fetch(self.request(Method::GET, &path))?)
    }
}

impl ReadMarker for HttpApi {
    fn mark_all_read(&self, peer_id: &str) -> Result<(), ReadSourceError> {
        let path = format!("/messages/conversation/{}/read-all", path_segment(peer_id));
        Ok(self.execute(self.request(Method::PUT, &path))?)
    }

    fn mark_message_read(&self, message_id: &str) -> Result<(), ReadSourceError> {
        let path = format!("/messages/{}/read", path_segment(message_id));
        Ok(self.execute(self.request(Method::PUT, &path))?)
    }
}

impl MessageSender for HttpApi {
    fn send_message(&self, receiver_id: &str, content: &str) -> Result<(), SendMessageSourceError> {
        let body = SendMessageBody {
            receiver_id,
            content,
        };
        Ok(self.execute(self.request(Method::POST, "/messages").json(&body))?)
    }
}

impl ProfileSource for HttpApi {
    fn fetch_profile(&self, token: &str) -> Result<SessionUser, ProfileSourceError> {
        Ok(self.fetch(self.request_with_token(Method::GET, "/auth/profile", token))?)
    }
}

impl CredentialsSource for HttpApi {
    fn login(&self, email: &str, password: &str) -> Result<Session, CredentialsSourceError> {
        let body = LoginBody { email, password };
        Ok(self.fetch(self.request(Method::POST, "/auth/login").json(&body))?)
    }
}
