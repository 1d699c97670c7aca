//! The reply rendering pipeline.
//!
//! ```text
//! raw reply ──> stash math behind placeholders ──> markdown to HTML
//!           ──> placeholders to span.math ──> parse tree
//!           ──> typeset math / augment code blocks / sanitize ──> HTML
//! ```

use std::sync::{Arc, LazyLock};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::clipboard::Clipboard;
use crate::copy::{CopyAction, CopyRegistry, CopyTable, new_copy_id};
use crate::escape::{push_attr, push_text};
use crate::markdown::markdown_to_html;
use crate::math::{self, MathStash, MathStyle};
use crate::sanitize::{Rewrite, sanitize_html, write_end_tag, write_fragment, write_start_tag};

static MATH_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.math").expect("valid math selector"));

static DISPLAY_MATH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".math-display").expect("valid display selector"));

static CODE_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("valid code block selector"));

static CODE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("valid code selector"));

/// Turns untrusted model replies into sanitized, interactive HTML.
///
/// Rendering never fails.  Each call replaces the contents of the shared
/// [`CopyRegistry`] with the copy actions for the code blocks of that reply.
pub struct ReplyRenderer {
    registry: Arc<CopyRegistry>,
    clipboard: Arc<dyn Clipboard>,
}

impl ReplyRenderer {
    /// Create a renderer that registers copy actions in `registry`, each
    /// writing to `clipboard`.
    pub fn new(registry: Arc<CopyRegistry>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            registry,
            clipboard,
        }
    }

    /// The registry this renderer fills.
    pub fn registry(&self) -> &Arc<CopyRegistry> {
        &self.registry
    }

    /// Render a raw reply into HTML.
    pub fn render(&self, raw: &str) -> String {
        if raw.is_empty() {
            self.registry.replace_all(CopyTable::new());
            return String::new();
        }

        let (protected, stash) = MathStash::protect(raw);
        let converted = markdown_to_html(&protected, &stash);
        let tagged = stash.substitute(&converted);

        let fragment = Html::parse_fragment(&tagged);
        let mut pass = RenderPass::new(Arc::clone(&self.clipboard));
        let html = write_fragment(&fragment, &mut pass);

        debug!(
            input_len = raw.len(),
            output_len = html.len(),
            math_stashed = stash.len(),
            math_spans = pass.math_spans,
            math_failures = pass.math_failures,
            code_blocks = pass.actions.len(),
            "rendered reply"
        );

        self.registry.replace_all(pass.actions);
        html
    }
}

/// State for one render: the copy table being built plus counters.
struct RenderPass {
    clipboard: Arc<dyn Clipboard>,
    actions: CopyTable,
    math_spans: usize,
    math_failures: usize,
}

impl RenderPass {
    fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            clipboard,
            actions: CopyTable::new(),
            math_spans: 0,
            math_failures: 0,
        }
    }

    /// Replace a math span's text with typeset MathML.
    ///
    /// On failure the span is left empty and tagged `math-error`.
    fn write_math(&mut self, span: ElementRef<'_>, out: &mut String) {
        self.math_spans += 1;

        let style = if DISPLAY_MATH.matches(&span) {
            MathStyle::Display
        } else {
            MathStyle::Inline
        };
        let expression: String = span.text().collect();
        let mut class = style.class_attr().to_owned();

        let body = if expression.trim().is_empty() {
            String::new()
        } else {
            match math::typeset(&expression, style) {
                Ok(mathml) => sanitize_html(&mathml),
                Err(reason) => {
                    self.math_failures += 1;
                    warn!(expression = %expression, error = %reason, "math typesetting failed");
                    class.push_str(" math-error");
                    String::new()
                }
            }
        };

        out.push_str("<span class=\"");
        out.push_str(&class);
        out.push_str("\">");
        out.push_str(&body);
        write_end_tag("span", out);
    }

    /// Replace a code block with a header row, a separator and the code.
    fn write_code_block(&mut self, pre: ElementRef<'_>, out: &mut String) {
        let code_text: String = pre.text().collect();
        let id = new_copy_id();
        let label = code_label(pre);

        self.actions.insert(
            id.clone(),
            CopyAction::new(code_text.clone(), Arc::clone(&self.clipboard)),
        );

        write_start_tag(pre, out);
        out.push_str(
            "<div class=\"copycode-header\" style=\"display:flex;justify-content:space-between;\">",
        );
        out.push_str("<div class=\"copycode-lang\">");
        push_text(out, &label);
        out.push_str("</div><div class=\"copycode-btn\" role=\"button\" data-copy-id=\"");
        push_attr(out, &id);
        out.push_str("\">Copy</div></div><hr><code>");
        push_text(out, &code_text);
        out.push_str("</code>");
        write_end_tag("pre", out);
    }
}

impl Rewrite for RenderPass {
    fn rewrite(&mut self, element: ElementRef<'_>, out: &mut String) -> bool {
        if MATH_SPAN.matches(&element) {
            self.write_math(element, out);
            true
        } else if CODE_BLOCK.matches(&element) {
            self.write_code_block(element, out);
            true
        } else {
            false
        }
    }
}

/// The label shown in a code block header: the fence language when there
/// is one, otherwise the block's own class.
fn code_label(pre: ElementRef<'_>) -> String {
    let language = pre.select(&CODE).next().and_then(|code| {
        code.value()
            .classes()
            .find_map(|class| class.strip_prefix("language-"))
            .map(str::to_owned)
    });

    language
        .or_else(|| pre.value().attr("class").map(str::to_owned))
        .unwrap_or_default()
}
