//! Chat core for chatmark.
//!
//! Holds the conversation, talks to the completion endpoint, and turns each
//! reply into display-ready HTML through `chatmark-render`.
//!
//! ```text
//! ┌─────────────┐  submit   ┌──────────────┐  turns   ┌──────────────────┐
//! │     UI      │──────────>│ ChatSession  │─────────>│ CompletionClient │
//! └─────────────┘           └──────┬───────┘  reply   └──────────────────┘
//!                                  │
//!                     ┌────────────┴────────────┐
//!                     │                         │
//!             ┌───────┴───────┐        ┌────────┴──────┐
//!             │ Conversation  │        │ ReplyRenderer │
//!             │    Store      │        │  (markdown)   │
//!             └───────────────┘        └───────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`llm`] -- Turns, the completion trait, and the OpenAI client.
//! - [`store`] -- The append-only conversation store.
//! - [`session`] -- Submit / new-chat flow and the loading gate.
//! - [`config`] -- File and environment configuration.
//! - [`error`] -- Agent error types.

pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod store;

pub use config::{ChatConfig, env_non_empty};
pub use error::{AgentError, Result};
pub use llm::{
    CompletionClient, CompletionConfig, CompletionMessage, CompletionRequest, OpenAiClient,
    Speaker, Turn, parse_completion_response,
};
pub use session::{ChatSession, FALLBACK_REPLY};
pub use store::ConversationStore;
