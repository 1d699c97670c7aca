//! Copy-action registry.
//!
//! Every rendered code block gets a "Copy" affordance tagged with a freshly
//! minted identifier.  The identifier resolves to a [`CopyAction`] in the
//! [`CopyRegistry`], which the page reaches through the HTTP surface.
//!
//! Each render replaces the whole table.  Buttons produced by an earlier
//! render resolve to [`RenderError::UnknownCopyAction`] afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::clipboard::Clipboard;
use crate::error::{RenderError, Result};

/// Identifier-to-action table produced by one render pass.
pub type CopyTable = HashMap<String, CopyAction>;

/// Mint an identifier for a copy action.
///
/// UUID v7 values carry a timestamp plus random bits, so identifiers do not
/// repeat across renders for the life of the process.
pub fn new_copy_id() -> String {
    format!("copy-{}", Uuid::now_v7().simple())
}

/// A zero-argument action that copies one code block's text.
#[derive(Clone)]
pub struct CopyAction {
    text: String,
    clipboard: Arc<dyn Clipboard>,
}

impl CopyAction {
    /// Create an action that writes `text` to `clipboard`.
    pub fn new(text: impl Into<String>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            text: text.into(),
            clipboard,
        }
    }

    /// The literal (unescaped) code text this action copies.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Write the captured text to the clipboard.
    pub fn invoke(&self) -> Result<()> {
        self.clipboard.write_text(&self.text)
    }
}

impl fmt::Debug for CopyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyAction")
            .field("text_len", &self.text.len())
            .finish_non_exhaustive()
    }
}

/// Result of running a registered copy action.
///
/// The text is always present so the caller can fall back to its own
/// clipboard when the local one is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    pub text: String,
    pub clipboard_error: Option<String>,
}

impl CopyOutcome {
    /// Whether the text reached the local clipboard.
    pub fn copied(&self) -> bool {
        self.clipboard_error.is_none()
    }
}

/// Shared mapping from identifier to [`CopyAction`].
#[derive(Debug, Default)]
pub struct CopyRegistry {
    actions: RwLock<CopyTable>,
}

impl CopyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every registered action and install `table` instead.
    pub fn replace_all(&self, table: CopyTable) {
        let mut actions = self.actions.write().unwrap_or_else(PoisonError::into_inner);
        let previous = actions.len();
        *actions = table;
        debug!(previous, current = actions.len(), "replaced copy actions");
    }

    /// Look up an action by identifier.
    pub fn get(&self, id: &str) -> Option<CopyAction> {
        self.actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Run the action registered under `id`.
    ///
    /// Only an unknown identifier is an error.  A clipboard failure is
    /// logged and carried in the outcome next to the text.  The lock is
    /// released before the clipboard is touched.
    pub fn invoke(&self, id: &str) -> Result<CopyOutcome> {
        let action = self.get(id).ok_or_else(|| RenderError::UnknownCopyAction {
            id: id.to_owned(),
        })?;

        let clipboard_error = match action.invoke() {
            Ok(()) => {
                debug!(id, len = action.text().len(), "copied code block");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "copy action failed");
                Some(e.to_string())
            }
        };

        Ok(CopyOutcome {
            text: action.text,
            clipboard_error,
        })
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
