//! LLM integration layer.
//!
//! - [`types`] -- Turns and the completion request body.
//! - [`client`] -- The [`CompletionClient`] trait and its OpenAI implementation.

pub mod client;
pub mod types;

pub use client::{
    CompletionClient, CompletionConfig, DEFAULT_MODEL, OPENAI_BASE_URL, OpenAiClient,
    parse_completion_response,
};
pub use types::{CompletionMessage, CompletionRequest, Speaker, Turn};
