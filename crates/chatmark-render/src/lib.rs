//! Reply rendering for chatmark.
//!
//! Model replies are untrusted markdown that may embed LaTeX math and code.
//! This crate turns them into sanitized HTML:
//!
//! - math written as `\(...\)` or `\[...\]` is typeset to MathML,
//! - code blocks get a header row with a "Copy" affordance backed by a
//!   [`CopyAction`] in a shared [`CopyRegistry`],
//! - raw HTML, event handlers and script URLs never reach the output.
//!
//! The entry point is [`ReplyRenderer::render`].

pub mod clipboard;
pub mod copy;
pub mod error;
pub mod escape;
mod markdown;
pub mod math;
pub mod renderer;
pub mod sanitize;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use copy::{CopyAction, CopyOutcome, CopyRegistry, CopyTable, new_copy_id};
pub use error::{RenderError, Result};
pub use escape::{escape_html, escape_user_text};
pub use math::MathStyle;
pub use renderer::ReplyRenderer;
pub use sanitize::sanitize_html;
