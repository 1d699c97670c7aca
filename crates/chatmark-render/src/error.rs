//! Error types for the rendering crate.

use thiserror::Error;

/// Errors surfaced by the copy-action registry and the clipboard seam.
///
/// Rendering itself never fails; these only come back from invoking a
/// registered copy action.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No copy action is registered under the given identifier.
    ///
    /// This is the normal outcome for a "Copy" button left over from an
    /// earlier render.
    #[error("unknown copy action: {id}")]
    UnknownCopyAction { id: String },

    /// The system clipboard could not be opened or written.
    #[error("clipboard error: {reason}")]
    Clipboard { reason: String },
}

/// Convenience alias for results within this crate.
pub type Result<T> = std::result::Result<T, RenderError>;
