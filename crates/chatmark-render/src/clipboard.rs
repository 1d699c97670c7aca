//! Clipboard access.
//!
//! Copy actions write through the [`Clipboard`] trait so the rendering
//! pipeline never touches the operating system directly.  The server uses
//! [`SystemClipboard`]; headless deployments and tests use
//! [`MemoryClipboard`].

use std::sync::{Mutex, PoisonError};

use crate::error::{RenderError, Result};

/// Destination for copied code text.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// The operating system clipboard, via `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| RenderError::Clipboard {
            reason: e.to_string(),
        })?;

        clipboard
            .set_text(text)
            .map_err(|e| RenderError::Clipboard {
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

/// An in-process clipboard that records every write.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently written text, if any.
    pub fn contents(&self) -> Option<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Every write, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_owned());
        Ok(())
    }
}
