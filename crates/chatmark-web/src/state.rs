//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers. The page talks to exactly one [`ChatSession`].

use std::sync::Arc;
use std::time::Instant;

use chatmark_agent::ChatSession;

/// Shared state accessible from every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The conversation behind the page.
    pub session: Arc<ChatSession>,

    /// When the server state was created.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(session: Arc<ChatSession>) -> Self {
        Self {
            session,
            started_at: Instant::now(),
        }
    }
}
