use std::{
    future::Future,
    sync::{PoisonError, RwLock},
};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::infra::{config::ApiConfig, error::AppError};

use super::error::ApiError;

const API_REQUEST_FAILED: &str = "API_REQUEST_FAILED";

/// REST adapter over the marketplace API.
///
/// Every use-case source trait is synchronous; calls are driven to
/// completion on the runtime owned here, so the adapter can be shared with
/// the poller thread behind an `Arc`.
pub struct HttpApi {
    rt: Runtime,
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.has_token())
            .finish()
    }
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let rt = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("pdesk-http")
            .enable_all()
            .build()
            .map_err(|error| AppError::HttpClient(Box::new(error)))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("pdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| AppError::HttpClient(Box::new(error)))?;

        Ok(Self {
            rt,
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token attached as `Authorization: Bearer` to every later call.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying the current session token, if any.
    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
        {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request carrying an explicit token instead of the stored one.
    pub(super) fn request_with_token(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client.request(method, self.url(path)).bearer_auth(token)
    }

    /// Sends `request` and decodes the payload, unwrapping a `{ "data": ... }`
    /// envelope when the server uses one.
    pub(super) fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.block_on(async {
            let response = send(request).await?;
            response
                .json::<Value>()
                .await
                .map_err(|error| ApiError::InvalidData(error.to_string()))
        })??;

        serde_json::from_value(unwrap_envelope(body))
            .map_err(|error| ApiError::InvalidData(error.to_string()))
    }

    /// Sends `request` and ignores whatever body comes back.
    pub(super) fn execute(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.block_on(async { send(request).await.map(|_| ()) })?
    }

    /// Blocking from inside an async context would panic, so it is refused.
    fn block_on<F: Future>(&self, future: F) -> Result<F::Output, ApiError> {
        if Handle::try_current().is_ok() {
            return Err(ApiError::Runtime(
                "blocking call issued from an async context".to_owned(),
            ));
        }

        Ok(self.rt.block_on(future))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(|error| {
        tracing::debug!(code = API_REQUEST_FAILED, error = %error, "request did not complete");
        ApiError::Network(error.without_url().to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_owned();
    let body = response.text().await.unwrap_or_default();
    let error = classify(status, &body);
    tracing::debug!(
        code = API_REQUEST_FAILED,
        status = status.as_u16(),
        path = %url,
        error = %error,
        "request failed"
    );

    Err(error)
}

fn classify(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message: error_message(body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            }),
        },
    }
}

/// Human-readable reason from an error body: `message` (string or list of
/// strings) or `error`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("message").or_else(|| value.get("error"))? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::usecases::{contracts::RemoteError, session_gate::ProfileSourceError};

    #[test]
    fn envelope_is_unwrapped_when_present() {
        assert_eq!(
            unwrap_envelope(json!({"success": true, "data": [1, 2]})),
            json!([1, 2])
        );
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            unwrap_envelope(json!({"token": "t"})),
            json!({"token": "t"})
        );
    }

    #[test]
    fn error_message_reads_message_error_or_list() {
        assert_eq!(
            error_message(r#"{"message": "booking not pending"}"#).as_deref(),
            Some("booking not pending")
        );
        assert_eq!(
            error_message(r#"{"error": "Bad Request"}"#).as_deref(),
            Some("Bad Request")
        );
        assert_eq!(
            error_message(r#"{"message": ["name must not be empty", "price must be positive"]}"#)
                .as_deref(),
            Some("name must not be empty; price must be positive")
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[test]
    fn forbidden_token_fails_the_profile_check() {
        let error = classify(StatusCode::FORBIDDEN, "");

        assert_eq!(
            ProfileSourceError::from(error.clone()),
            ProfileSourceError::Unauthorized
        );
        assert_eq!(RemoteError::from(error), RemoteError::Unauthorized);
    }

    #[test]
    fn statuses_are_classified() {
        assert_eq!(classify(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized);
        assert_eq!(
            classify(StatusCode::FORBIDDEN, r#"{"message": "token revoked"}"#),
            ApiError::Unauthorized
        );
        assert_eq!(classify(StatusCode::NOT_FOUND, ""), ApiError::NotFound);
        assert_eq!(
            classify(StatusCode::CONFLICT, r#"{"message": "already accepted"}"#),
            ApiError::Rejected {
                status: 409,
                message: "already accepted".to_owned(),
            }
        );
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, ""),
            ApiError::Rejected {
                status: 502,
                message: "Bad Gateway".to_owned(),
            }
        );
    }
}
