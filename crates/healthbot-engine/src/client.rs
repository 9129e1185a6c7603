//! Completion clients.
//!
//! [`CompletionClient`] is the seam between the conversation and the network.
//! [`HttpCompletionClient`] speaks both wire variants:
//!
//! - direct: `POST <endpoint>` with `{ messages, model }` and a bearer token
//! - proxy: `POST <base>/api/chat` with `{ messages }` and no credential
//!
//! Both expect `{ "choices": [ { "message": { "role", "content" } } ] }` back.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, Transport};
use crate::message::Message;

/// Text used when an error response carries no message of its own.
pub const GENERIC_API_ERROR: &str = "An error occurred.";

/// Something that can turn a conversation history into the next assistant message.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the full ordered history and return the assistant's reply.
    async fn complete(&self, messages: &[Message]) -> Result<Message, CompletionError>;
}

/// Request body. `model` is only sent by the direct transport.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<Message>,
}

/// HTTP client for chat-completion endpoints.
pub struct HttpCompletionClient {
    http: HttpClient,
    endpoint: String,
    transport: Transport,
    model: String,
}

impl HttpCompletionClient {
    /// Create a client. The bearer header is attached only for the direct
    /// transport and only when a credential is given.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Transport,
        model: impl Into<String>,
        api_key: Option<&str>,
    ) -> Result<Self, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let (Transport::Direct, Some(key)) = (transport, api_key) {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| CompletionError::InvalidCredential(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(CompletionError::Transport)?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            transport,
            model: model.into(),
        })
    }

    /// Create a client from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        Self::new(
            config.endpoint_url(),
            config.transport,
            config.model.clone(),
            config.api_key.as_deref(),
        )
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body for `messages`.
    pub fn request_body<'a>(&'a self, messages: &'a [Message]) -> CompletionRequest<'a> {
        let model = match self.transport {
            Transport::Direct => Some(self.model.as_str()),
            Transport::Proxy => None,
        };
        CompletionRequest { messages, model }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, messages: &[Message]) -> Result<Message, CompletionError> {
        debug!(
            endpoint = %self.endpoint,
            transport = %self.transport,
            messages = messages.len(),
            "sending completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&self.request_body(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(status, &body);
            warn!(%status, %message, "completion endpoint returned an error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(chars = reply.content.len(), "received completion");
        Ok(reply)
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Accepts `{ "error": { "message": "..." } }` and `{ "error": "..." }`.
/// Non-JSON bodies yield `HTTP <status>`.
fn api_error_message(status: StatusCode, body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return format!("HTTP {status}");
    };

    let error = value.get("error");
    error
        .and_then(|e| e.get("message"))
        .and_then(serde_json::Value::as_str)
        .or_else(|| error.and_then(serde_json::Value::as_str))
        .filter(|message| !message.is_empty())
        .unwrap_or(GENERIC_API_ERROR)
        .to_string()
}

/// Errors that can occur during a completion exchange.
///
/// The `Display` text is what the user sees in the transcript.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Network or decoding failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Success response without a message.
    #[error("The model returned an empty response.")]
    EmptyResponse,

    /// Credential cannot be used as a header value.
    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    /// The request never settled normally (e.g. the task was lost).
    #[error("{0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn history() -> Vec<Message> {
        vec![Message::system("Be brief."), Message::user("hello")]
    }

    fn direct_client(server: &MockServer, key: Option<&str>) -> HttpCompletionClient {
        HttpCompletionClient::new(
            format!("{}/openai/v1/chat/completions", server.uri()),
            Transport::Direct,
            "llama-3.3-70b-versatile",
            key,
        )
        .unwrap()
    }

    #[test]
    fn test_direct_request_body_snapshot() {
        let client = HttpCompletionClient::new(
            "http://localhost/v1/chat/completions",
            Transport::Direct,
            "llama-3.3-70b-versatile",
            Some("key"),
        )
        .unwrap();
        let messages = history();
        insta::assert_json_snapshot!(client.request_body(&messages), @r#"
        {
          "messages": [
            {
              "role": "system",
              "content": "Be brief."
            },
            {
              "role": "user",
              "content": "hello"
            }
          ],
          "model": "llama-3.3-70b-versatile"
        }
        "#);
    }

    #[test]
    fn test_proxy_request_body_has_no_model() {
        let client = HttpCompletionClient::new(
            "http://localhost/api/chat",
            Transport::Proxy,
            "ignored",
            Some("key"),
        )
        .unwrap();
        let messages = history();
        let json = serde_json::to_value(client.request_body(&messages)).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_api_error_message_shapes() {
        let status = StatusCode::UNAUTHORIZED;
        assert_eq!(
            api_error_message(status, r#"{"error":{"message":"Invalid API Key"}}"#),
            "Invalid API Key"
        );
        assert_eq!(
            api_error_message(status, r#"{"error":"proxy down"}"#),
            "proxy down"
        );
        assert_eq!(api_error_message(status, r#"{"error":{}}"#), GENERIC_API_ERROR);
        assert_eq!(api_error_message(status, "<html>"), "HTTP 401 Unauthorized");
    }

    #[tokio::test]
    async fn test_direct_success_sends_bearer_and_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hello"}
                ],
                "model": "llama-3.3-70b-versatile"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi there"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = direct_client(&server, Some("gsk_test"));
        let reply = client.complete(&history()).await.unwrap();
        assert_eq!(reply, Message::assistant("Hi there"));
    }

    #[tokio::test]
    async fn test_proxy_posts_messages_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "From proxy"}}]
            })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.use_proxy(&server.uri());
        let client = HttpCompletionClient::from_config(&config).unwrap();
        assert!(client.endpoint().ends_with("/api/chat"));

        let reply = client.complete(&history()).await.unwrap();
        assert_eq!(reply.content, "From proxy");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_error_status_surfaces_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid API Key", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let client = direct_client(&server, Some("bad"));
        let err = client.complete(&history()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Api { status: 401, .. }));
        assert_eq!(err.to_string(), "Invalid API Key");
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = direct_client(&server, Some("key"));
        let err = client.complete(&history()).await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = HttpCompletionClient::new(
            "http://127.0.0.1:9/v1/chat/completions",
            Transport::Direct,
            "model",
            Some("key"),
        )
        .unwrap();
        let err = client.complete(&history()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_invalid_credential_rejected() {
        let result = HttpCompletionClient::new(
            "http://localhost",
            Transport::Direct,
            "model",
            Some("bad\nkey"),
        );
        assert!(matches!(result, Err(CompletionError::InvalidCredential(_))));
    }
}
