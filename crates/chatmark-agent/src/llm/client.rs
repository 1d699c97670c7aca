//! Completion client for the OpenAI Chat Completions API.
//!
//! Works against `api.openai.com` and any OpenAI-compatible endpoint
//! (Ollama, vLLM, Together) that accepts the same request shape. Replies are
//! requested non-streaming; the whole text arrives in one response.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::llm::types::{CompletionRequest, Turn};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Per-request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Anything that can turn a conversation history into the next reply.
///
/// The session depends on this trait rather than on [`OpenAiClient`] so tests
/// and alternative backends can be swapped in.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the full history and return the reply text.
    ///
    /// Returns [`AgentError::EmptyReply`] when the provider answers without
    /// any text.
    async fn complete(&self, turns: &[Turn]) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

/// Connection settings for a chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Bearer token.
    pub api_key: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Value of the request's `store` flag.
    pub store: bool,
}

impl CompletionConfig {
    /// Configuration for the hosted OpenAI API with the default model.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            store: true,
        }
    }

    /// Configuration for any OpenAI-compatible endpoint.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            store: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: CompletionConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client. Fails when the API key is empty.
    pub fn new(config: CompletionConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AgentError::MissingApiKey {
                provider: "openai".into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// The model this client requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// The full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Build the request body for `turns`.
    pub fn build_request_body(&self, turns: &[Turn]) -> CompletionRequest {
        CompletionRequest::new(&self.config.model, self.config.store, turns)
    }

    async fn send_request(&self, body: &CompletionRequest) -> Result<reqwest::Response> {
        let url = self.endpoint();

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(
            url = %url,
            model = %body.model,
            messages = body.messages.len(),
            "sending completion request"
        );

        self.http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        let body = self.build_request_body(turns);
        let resp = self.send_request(&body).await?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(AgentError::LlmRequestFailed {
                reason: format!("API returned {status}: {text}"),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| AgentError::LlmParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })?;

        let reply = parse_completion_response(&v)?;
        tracing::debug!(chars = reply.len(), "completion received");
        Ok(reply)
    }
}

// ===========================================================================
// Response parsing
// ===========================================================================

/// Extract the reply text from a chat-completions response.
///
/// Only `choices[0].message.content` is read. A null, missing, or empty
/// content is reported as [`AgentError::EmptyReply`].
pub fn parse_completion_response(v: &Value) -> Result<String> {
    let message = &v["choices"][0]["message"];

    if message.is_null() {
        return Err(AgentError::LlmParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }

    match message["content"].as_str() {
        Some(content) if !content.is_empty() => Ok(content.to_owned()),
        _ => Err(AgentError::EmptyReply),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_config_construction() {
        let config = CompletionConfig::openai("sk-test");
        assert_eq!(config.base_url, OPENAI_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.store);
    }

    #[test]
    fn openai_compatible_config_construction() {
        let config =
            CompletionConfig::openai_compatible("key", "llama3", "http://localhost:11434/v1");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn empty_api_key_returns_error() {
        let result = OpenAiClient::new(CompletionConfig::openai(""));
        assert!(matches!(result, Err(AgentError::MissingApiKey { .. })));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = OpenAiClient::new(CompletionConfig::openai_compatible(
            "k",
            "m",
            "http://localhost:8080/v1/",
        ))
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn build_request_body_basic() {
        let client = OpenAiClient::new(CompletionConfig::openai("sk-test")).unwrap();
        let body = client.build_request_body(&[Turn::user("hi"), Turn::assistant("<p>hey</p>")]);

        assert_eq!(body.model, "gpt-4o-mini");
        assert!(body.store);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[1].role, "assistant");
        assert_eq!(body.messages[1].content, "<p>hey</p>");
    }

    #[test]
    fn parse_text_response() {
        let response_json = serde_json::json!({
            "id": "chatcmpl-abc",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "2 + 2 = **4**"},
                "finish_reason": "stop"
            }]
        });

        let text = parse_completion_response(&response_json).unwrap();
        assert_eq!(text, "2 + 2 = **4**");
    }

    #[test]
    fn parse_null_content_is_empty_reply() {
        let response_json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        });
        assert!(matches!(
            parse_completion_response(&response_json),
            Err(AgentError::EmptyReply)
        ));
    }

    #[test]
    fn parse_empty_content_is_empty_reply() {
        let response_json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        });
        assert!(matches!(
            parse_completion_response(&response_json),
            Err(AgentError::EmptyReply)
        ));
    }

    #[test]
    fn parse_missing_choices_fails() {
        let response_json = serde_json::json!({"error": {"message": "bad"}});
        assert!(matches!(
            parse_completion_response(&response_json),
            Err(AgentError::LlmParseFailed { .. })
        ));
    }
}
