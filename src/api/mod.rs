//! REST adapter: HTTP client, endpoint bindings and the thread poller.

mod client;
pub mod error;
mod messaging;
pub mod poller;
mod provider;

pub use client::HttpApi;

/// Percent-encodes an opaque id so it can be placed in a URL path.
fn path_segment(id: &str) -> String {
    let mut encoded = String::with_capacity(id.len());
    for byte in id.trim().bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::Path};

    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{
        domain::{
            booking::{BookingAction, BookingStatus},
            catalog::ServiceDraft,
            kyc::KycDocumentType,
        },
        infra::config::ApiConfig,
        usecases::{
            bookings::BookingsSource,
            catalog::CatalogSource,
            contracts::RemoteError,
            kyc::KycSource,
            list_conversations::{ConversationsSource, ConversationsSourceError},
            load_messages::{MessagesSource, MessagesSourceError},
            mark_read::ReadMarker,
            send_message::{MessageSender, SendMessageSourceError},
            session_gate::{CredentialsSource, ProfileSource, ProfileSourceError},
            stats::StatsSource,
        },
    };

    /// Mock server on its own runtime; the adapter under test blocks on a
    /// separate one, as it does in the application.
    struct Server {
        rt: Runtime,
        mock: MockServer,
    }

    impl Server {
        fn start() -> Self {
            let rt = Runtime::new().expect("test runtime should start");
            let mock = rt.block_on(MockServer::start());
            Self { rt, mock }
        }

        fn mount(&self, mock: Mock) {
            self.rt.block_on(mock.mount(&self.mock));
        }

        fn api(&self) -> HttpApi {
            let config = ApiConfig {
                base_url: format!("{}/api", self.mock.uri()),
                ..ApiConfig::default()
            };
            let api = HttpApi::new(&config).expect("api should build");
            api.set_token(Some("tok-123".to_owned()));
            api
        }
    }

    #[test]
    fn path_segment_escapes_reserved_characters() {
        assert_eq!(path_segment("42"), "42");
        assert_eq!(path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(path_segment(" u-1 "), "u-1");
    }

    #[test]
    fn lists_conversations_with_bearer_token_and_envelope() {
        let server = Server::start();
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/messages/conversations"))
                .and(header("authorization", "Bearer tok-123"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "data": [{
                        "user": {"id": 7, "fullName": "Le C", "role": "USER"},
                        "lastMessage": {"content": "hi", "createdAt": "2026-03-01T08:00:00Z"},
                        "unreadCount": 2
                    }]
                }))),
        );

        let rows = server
            .api()
            .list_conversations()
            .expect("conversations should load");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].peer_id(), "7");
        assert_eq!(rows[0].unread_count, 2);
    }

    #[test]
    fn loads_bare_thread_payload() {
        let server = Server::start();
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/messages/conversation/7"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": 1, "senderId": 7, "receiverId": 1, "content": "a", "createdAt": "2026-03-01T08:00:00Z"},
                    {"id": 2, "senderId": 1, "receiverId": 7, "content": "b", "createdAt": "2026-03-01T08:01:00Z"}
                ]))),
        );

        let messages = server.api().list_messages("7").expect("thread should load");

        let ids: Vec<&str> = messages.iter().map(|msg| msg.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn unauthorized_and_malformed_responses_are_classified() {
        let server = Server::start();
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/messages/conversations"))
                .respond_with(ResponseTemplate::new(401)),
        );
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/messages/conversation/7"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "nope"}))),
        );

        let api = server.api();

        assert_eq!(
            api.list_conversations(),
            Err(ConversationsSourceError::Unauthorized)
        );
        assert_eq!(api.list_messages("7"), Err(MessagesSourceError::InvalidData));
    }

    #[test]
    fn sends_message_body_and_marks_read() {
        let server = Server::start();
        server.mount(
            Mock::given(method("POST"))
                .and(path("/api/messages"))
                .and(body_json(json!({"receiverId": "7", "content": "hello"})))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
                .expect(1),
        );
        server.mount(
            Mock::given(method("PUT"))
                .and(path("/api/messages/conversation/7/read-all"))
                .respond_with(ResponseTemplate::new(200))
                .expect(1),
        );
        server.mount(
            Mock::given(method("PUT"))
                .and(path("/api/messages/9/read"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1),
        );

        let api = server.api();
        api.send_message("7", "hello").expect("send should succeed");
        api.mark_all_read("7").expect("read-all should succeed");
        api.mark_message_read("9").expect("read should succeed");

        server.rt.block_on(server.mock.verify());
    }

    #[test]
    fn send_rejection_carries_server_message() {
        let server = Server::start();
        server.mount(
            Mock::given(method("POST"))
                .and(path("/api/messages"))
                .respond_with(
                    ResponseTemplate::new(400)
                        .set_body_json(json!({"message": "receiver is blocked"})),
                ),
        );

        assert_eq!(
            server.api().send_message("7", "hello"),
            Err(SendMessageSourceError::Rejected("receiver is blocked".to_owned()))
        );
    }

    #[test]
    fn login_and_profile_use_auth_endpoints() {
        let server = Server::start();
        server.mount(
            Mock::given(method("POST"))
                .and(path("/api/auth/login"))
                .and(body_json(json!({"email": "a@example.com", "password": "pw"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "token": "new-token",
                    "user": {"id": "p1", "fullName": "Nguyen A", "role": "PROVIDER", "businessName": "Shop X"}
                }))),
        );
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/auth/profile"))
                .and(header("authorization", "Bearer new-token"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "data": {"id": "p1", "fullName": "Nguyen A", "role": "PROVIDER"}
                }))),
        );
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/auth/profile"))
                .and(header("authorization", "Bearer stale"))
                .respond_with(ResponseTemplate::new(401)),
        );

        let api = server.api();
        let session = api
            .login("a@example.com", "pw")
            .expect("login should succeed");

        assert_eq!(session.token, "new-token");
        assert_eq!(session.user.display_name(), "Shop X");
        assert_eq!(
            api.fetch_profile("new-token").map(|user| user.id),
            Ok("p1".to_owned())
        );
        assert_eq!(
            api.fetch_profile("stale"),
            Err(ProfileSourceError::Unauthorized)
        );
    }

    #[test]
    fn bookings_filter_and_reject_reason() {
        let server = Server::start();
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/provider/bookings"))
                .and(query_param("status", "PENDING"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                    "id": "b1",
                    "status": "PENDING",
                    "startTime": "2026-06-01T09:00:00Z"
                }]))),
        );
        server.mount(
            Mock::given(method("POST"))
                .and(path("/api/provider/bookings/b1/reject"))
                .and(body_json(json!({"reason": "fully booked"})))
                .respond_with(ResponseTemplate::new(200))
                .expect(1),
        );

        let api = server.api();
        let bookings = api
            .list_bookings(Some(BookingStatus::Pending))
            .expect("bookings should load");
        api.transition_booking("b1", BookingAction::Reject, Some("fully booked"))
            .expect("reject should succeed");

        assert_eq!(bookings[0].status, BookingStatus::Pending);
        server.rt.block_on(server.mock.verify());
    }

    #[test]
    fn service_status_toggle_and_validation_error() {
        let server = Server::start();
        server.mount(
            Mock::given(method("PATCH"))
                .and(path("/api/provider/services/s1/status"))
                .and(body_json(json!({"isActive": false})))
                .respond_with(ResponseTemplate::new(200))
                .expect(1),
        );
        server.mount(
            Mock::given(method("POST"))
                .and(path("/api/provider/services"))
                .respond_with(
                    ResponseTemplate::new(422)
                        .set_body_json(json!({"message": ["category is unknown"]})),
                ),
        );

        let api = server.api();
        api.set_service_active("s1", false)
            .expect("toggle should succeed");
        let created = api.create_service(&ServiceDraft {
            name: "Gel nails".to_owned(),
            description: None,
            price: 250_000.0,
            duration_minutes: 60,
            category: Some("nope".to_owned()),
        });

        assert_eq!(
            created,
            Err(RemoteError::Rejected("category is unknown".to_owned()))
        );
        server.rt.block_on(server.mock.verify());
    }

    #[test]
    fn kyc_upload_is_multipart() {
        let server = Server::start();
        server.mount(
            Mock::given(method("POST"))
                .and(path("/api/kyc/upload"))
                .and(header_contains_multipart())
                .respond_with(ResponseTemplate::new(201))
                .expect(1),
        );
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let file = dir.path().join("front.jpg");
        std::fs::File::create(&file)
            .and_then(|mut handle| handle.write_all(b"jpeg"))
            .expect("fixture should be written");

        server
            .api()
            .upload_document(KycDocumentType::IdCardFront, &file)
            .expect("upload should succeed");

        server.rt.block_on(server.mock.verify());
        let requests = server
            .rt
            .block_on(server.mock.received_requests())
            .expect("requests should be recorded");
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"type\""));
        assert!(body.contains("ID_CARD_FRONT"));
        assert!(body.contains("filename=\"front.jpg\""));
    }

    #[test]
    fn unreadable_kyc_file_is_rejected_locally() {
        let server = Server::start();

        let result = server
            .api()
            .upload_document(KycDocumentType::Portrait, Path::new("/definitely/missing.jpg"));

        assert!(matches!(result, Err(RemoteError::Rejected(_))));
    }

    #[test]
    fn stats_default_missing_fields_and_server_errors_are_unavailable() {
        let server = Server::start();
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/provider/stats"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"data": {"totalBookings": 12}})),
                ),
        );
        server.mount(
            Mock::given(method("GET"))
                .and(path("/api/provider/services"))
                .respond_with(ResponseTemplate::new(500)),
        );

        let api = server.api();
        let stats = api.fetch_stats().expect("stats should load");

        assert_eq!(stats.total_bookings, 12);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(api.list_services(), Err(RemoteError::Unavailable));
    }

    #[test]
    fn unreachable_server_is_unavailable() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9/api".to_owned(),
            request_timeout_ms: 500,
        };
        let api = HttpApi::new(&config).expect("api should build");

        assert_eq!(api.fetch_stats(), Err(RemoteError::Unavailable));
    }

    fn header_contains_multipart() -> impl wiremock::Match {
        |request: &wiremock::Request| {
            request
                .headers
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with("multipart/form-data"))
        }
    }
}
