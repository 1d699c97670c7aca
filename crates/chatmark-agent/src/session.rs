//! Chat session: one conversation, one completion client, one renderer.
//!
//! The session is the only writer of its [`ConversationStore`]. A submit
//! appends the user turn, asks the client for the next reply, renders it and
//! appends the assistant turn. At most one submit is in flight at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chatmark_render::{CopyOutcome, ReplyRenderer};
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::llm::{CompletionClient, Turn};
use crate::store::ConversationStore;

/// Assistant turn appended when the completion fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I can't answer your question.";

/// A single chat conversation with its loading gate.
pub struct ChatSession {
    store: ConversationStore,
    client: Arc<dyn CompletionClient>,
    renderer: ReplyRenderer,
    loading: AtomicBool,
}

impl ChatSession {
    pub fn new(client: Arc<dyn CompletionClient>, renderer: ReplyRenderer) -> Self {
        Self {
            store: ConversationStore::new(),
            client,
            renderer,
            loading: AtomicBool::new(false),
        }
    }

    /// Submit raw user text and wait for the assistant turn.
    ///
    /// Completion failures never surface here: they become the
    /// [`FALLBACK_REPLY`] turn. The returned errors are
    /// [`AgentError::EmptyMessage`] for blank input and
    /// [`AgentError::Busy`] while another submit is pending.
    pub async fn submit(&self, text: &str) -> Result<Turn> {
        if text.trim().is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let _guard = LoadingGuard::acquire(&self.loading).ok_or(AgentError::Busy)?;

        self.store.append(Turn::from_user_input(text));
        let history = self.store.snapshot();
        info!(turns = history.len(), "submitting conversation");

        let reply = match self.client.complete(&history).await {
            Ok(raw) => {
                debug!(chars = raw.len(), "rendering reply");
                Turn::assistant(self.renderer.render(&raw))
            }
            Err(e) => {
                warn!(error = %e, "completion failed, using fallback reply");
                Turn::assistant(FALLBACK_REPLY)
            }
        };

        self.store.append(reply.clone());
        Ok(reply)
    }

    /// Start a new conversation.
    ///
    /// A submit that is still pending appends its reply to the new,
    /// cleared conversation.
    pub fn new_chat(&self) {
        self.store.clear();
        info!("new chat started");
    }

    /// Whether a submit is waiting on the completion client.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.store.snapshot()
    }

    pub fn turn_count(&self) -> usize {
        self.store.len()
    }

    /// Run the copy action registered under `id` by the latest render.
    pub fn copy(&self, id: &str) -> Result<CopyOutcome> {
        Ok(self.renderer.registry().invoke(id)?)
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("turns", &self.store.len())
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

/// Holds the loading flag for the duration of one submit.
///
/// Dropping the guard releases the flag, including when the submit future
/// is dropped mid-request.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);

        let guard = LoadingGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(LoadingGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(LoadingGuard::acquire(&flag).is_some());
    }
}
