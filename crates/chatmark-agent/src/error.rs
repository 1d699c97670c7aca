//! Agent error types.
//!
//! Every fallible operation in this crate surfaces an [`AgentError`].
//! Completion failures are recovered by the chat session; the remaining
//! variants reach callers.

/// Unified error type for the chat agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // -- Completion errors ---------------------------------------------------
    /// An HTTP request to the completion endpoint failed or returned a
    /// non-success status.
    #[error("llm request failed: {reason}")]
    LlmRequestFailed { reason: String },

    /// The completion response could not be parsed into a reply.
    #[error("llm response parse error: {reason}")]
    LlmParseFailed { reason: String },

    /// The response parsed but carried no reply text.
    #[error("llm returned an empty reply")]
    EmptyReply,

    /// The API key is missing for a provider that requires one.
    #[error("missing api key for provider: {provider}")]
    MissingApiKey { provider: String },

    // -- Session errors ------------------------------------------------------
    /// A submit arrived while another request was still in flight.
    #[error("a request is already in flight")]
    Busy,

    /// The submitted message was blank.
    #[error("message is empty")]
    EmptyMessage,

    // -- Configuration errors ------------------------------------------------
    /// Configuration loading or validation failed.
    #[error("config error: {reason}")]
    ConfigError { reason: String },

    // -- Rendering -----------------------------------------------------------
    /// A copy action failed or was not found.
    #[error(transparent)]
    Render(#[from] chatmark_render::RenderError),

    // -- Serialization -------------------------------------------------------
    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        Self::LlmRequestFailed {
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AgentError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            reason: err.to_string(),
        }
    }
}
