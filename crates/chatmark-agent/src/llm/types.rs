//! Core conversation types.
//!
//! [`Turn`] is the display-ready unit the store keeps and the page shows.
//! [`CompletionRequest`] is the wire body the client sends; it is built from
//! turns and nothing else.

use serde::Serialize;

use chatmark_render::escape_user_text;

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// Input from the human user.
    User,
    /// Output from the model.
    Assistant,
}

impl Speaker {
    /// The chat-completions role for this speaker.
    pub fn role(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One exchanged message, stored in display-ready form.
///
/// User turns hold escaped plain text; assistant turns hold rendered HTML.
/// Turns are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    speaker: Speaker,
    content: String,
}

impl Turn {
    /// Build a turn from display-ready content.
    pub fn new(speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
        }
    }

    /// A user turn from already-escaped content.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content)
    }

    /// An assistant turn from rendered HTML.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, content)
    }

    /// A user turn from raw input text, escaped for display.
    pub fn from_user_input(raw: &str) -> Self {
        Self::user(escape_user_text(raw))
    }

    /// Who produced this turn.
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// The display-ready content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

// ---------------------------------------------------------------------------
// Completion request
// ---------------------------------------------------------------------------

/// One `{role, content}` entry of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionMessage {
    /// `"user"` or `"assistant"`.
    pub role: &'static str,
    /// The turn content as shown on the page.
    pub content: String,
}

impl From<&Turn> for CompletionMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.speaker().role(),
            content: turn.content().to_owned(),
        }
    }
}

/// The full request body sent to the completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// The model identifier (e.g. `"gpt-4o-mini"`).
    pub model: String,

    /// Whether the provider should retain the completion.
    pub store: bool,

    /// The conversation history, oldest first.
    pub messages: Vec<CompletionMessage>,
}

impl CompletionRequest {
    /// Build a request for `turns`, in order.
    pub fn new(model: impl Into<String>, store: bool, turns: &[Turn]) -> Self {
        Self {
            model: model.into(),
            store,
            messages: turns.iter().map(CompletionMessage::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_roles() {
        assert_eq!(Speaker::User.role(), "user");
        assert_eq!(Speaker::Assistant.role(), "assistant");
    }

    #[test]
    fn user_input_is_escaped() {
        let turn = Turn::from_user_input("<b>hi</b>");
        assert_eq!(turn.speaker(), Speaker::User);
        assert_eq!(turn.content(), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn turn_serializes_with_lowercase_speaker() {
        let json = serde_json::to_value(Turn::assistant("<p>ok</p>")).unwrap();
        assert_eq!(json["speaker"], "assistant");
        assert_eq!(json["content"], "<p>ok</p>");
    }

    #[test]
    fn request_keeps_turn_order_and_roles() {
        let turns = vec![
            Turn::user("q1"),
            Turn::assistant("a1"),
            Turn::assistant("a2"),
            Turn::user("q2"),
        ];
        let request = CompletionRequest::new("gpt-4o-mini", true, &turns);

        let roles: Vec<&str> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["user", "assistant", "assistant", "user"]);
        assert_eq!(request.messages[3].content, "q2");
    }

    #[test]
    fn request_serializes_only_model_store_and_messages() {
        let request = CompletionRequest::new("m", true, &[Turn::user("2+2?")]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "store": true,
                "messages": [{"role": "user", "content": "2+2?"}],
            })
        );
    }
}
