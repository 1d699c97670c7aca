//! REST API route handlers.
//!
//! Provides endpoints for status, the conversation snapshot, submit,
//! new chat and code-block copy actions.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use chatmark_agent::{AgentError, Turn};
use chatmark_render::RenderError;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub loading: bool,
    pub turns: usize,
    pub uptime_seconds: u64,
}

/// Report whether a reply is pending and how long the conversation is.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        loading: state.session.is_loading(),
        turns: state.session.turn_count(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/messages
// ---------------------------------------------------------------------------

/// Return every turn of the current conversation, oldest first.
pub async fn messages(State(state): State<Arc<AppState>>) -> Json<Vec<Turn>> {
    Json(state.session.snapshot())
}

// ---------------------------------------------------------------------------
// POST /api/chat
// ---------------------------------------------------------------------------

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// The raw user message.
    pub message: String,
}

/// Submit a message and wait for the assistant turn.
///
/// Completion failures still answer 200 with the fallback turn. Blank input
/// is 400 and a submit during a pending one is 409.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> (StatusCode, Json<Value>) {
    match state.session.submit(&body.message).await {
        Ok(turn) => (StatusCode::OK, Json(json!(turn))),
        Err(AgentError::Busy) => {
            tracing::debug!("chat rejected, request in flight");
            (
                StatusCode::CONFLICT,
                Json(json!({"error": AgentError::Busy.to_string()})),
            )
        }
        Err(AgentError::EmptyMessage) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": AgentError::EmptyMessage.to_string()})),
        ),
        Err(e) => {
            tracing::error!(error = %e, "chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/new
// ---------------------------------------------------------------------------

/// Clear the conversation.
pub async fn new_chat(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.session.new_chat();
    Json(json!({"cleared": true}))
}

// ---------------------------------------------------------------------------
// POST /api/copy/{id}
// ---------------------------------------------------------------------------

/// Run the copy action behind a rendered "Copy" button.
///
/// The copied text is returned so the page can also place it on the
/// browser's clipboard.  When the server clipboard is unavailable the text
/// still comes back with `copied: false` and the clipboard error.
pub async fn copy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    // The system clipboard may block on the display server.
    let session = Arc::clone(&state.session);
    let result = match tokio::task::spawn_blocking(move || session.copy(&id)).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "copy task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"copied": false, "error": e.to_string()})),
            );
        }
    };

    match result {
        Ok(outcome) => {
            let mut body = json!({"copied": outcome.copied(), "text": outcome.text});
            if let Some(error) = outcome.clipboard_error {
                body["error"] = Value::String(error);
            }
            (StatusCode::OK, Json(body))
        }
        Err(AgentError::Render(RenderError::UnknownCopyAction { id })) => (
            StatusCode::NOT_FOUND,
            Json(json!({"copied": false, "error": format!("unknown copy action: {id}")})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"copied": false, "error": e.to_string()})),
        ),
    }
}
