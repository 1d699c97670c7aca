//! Math delimiter protection and typesetting.
//!
//! Replies write math as `\(...\)` (inline) and `\[...\]` (display).  A
//! markdown converter treats `\(` as an escaped parenthesis and would also
//! rewrite escapes and emphasis inside the LaTeX, so each expression is
//! lifted out behind a private-use placeholder before conversion and put
//! back as a `span.math` element after it.

use latex2mathml::{DisplayStyle, latex_to_mathml};

use crate::escape::escape_html;

const INLINE_START: char = '\u{E000}';
const INLINE_END: char = '\u{E001}';
const DISPLAY_START: char = '\u{E002}';
const DISPLAY_END: char = '\u{E003}';

/// Opening tag written in place of an inline placeholder.
const INLINE_OPEN_TAG: &str = r#"<span class="math math-inline">"#;

/// Opening tag written in place of a display placeholder.
const DISPLAY_OPEN_TAG: &str = r#"<span class="math math-display">"#;

/// How a math span is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathStyle {
    /// Flows with the surrounding text (`\(...\)`).
    Inline,
    /// Set on its own line (`\[...\]`).
    Display,
}

impl MathStyle {
    /// The class attribute carried by a span of this style.
    pub fn class_attr(self) -> &'static str {
        match self {
            Self::Inline => "math math-inline",
            Self::Display => "math math-display",
        }
    }

    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Inline => (r"\(", r"\)"),
            Self::Display => (r"\[", r"\]"),
        }
    }

    fn sentinels(self) -> (char, char) {
        match self {
            Self::Inline => (INLINE_START, INLINE_END),
            Self::Display => (DISPLAY_START, DISPLAY_END),
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            Self::Inline => INLINE_OPEN_TAG,
            Self::Display => DISPLAY_OPEN_TAG,
        }
    }
}

fn is_sentinel(ch: char) -> bool {
    matches!(ch, INLINE_START | INLINE_END | DISPLAY_START | DISPLAY_END)
}

/// Whether the text contains any sentinel character.
pub(crate) fn has_sentinels(text: &str) -> bool {
    text.chars().any(is_sentinel)
}

/// Math expressions lifted out of a reply before markdown conversion.
///
/// Each delimited expression is replaced by a placeholder made of a start
/// sentinel, its decimal index and an end sentinel.  Markdown never sees
/// the LaTeX, so escapes like `\{` and pairs like `a*b*c` reach the
/// typesetter untouched.
#[derive(Debug, Default)]
pub(crate) struct MathStash {
    expressions: Vec<String>,
}

impl MathStash {
    /// Replace every `\(...\)` and `\[...\]` in `text` with a placeholder.
    ///
    /// Sentinel characters already present in the input are dropped so that
    /// a reply cannot forge a placeholder.  An opener without a closer, or
    /// whose body holds a backtick, is left as it is.
    pub(crate) fn protect(text: &str) -> (String, Self) {
        let clean: String = text.chars().filter(|c| !is_sentinel(*c)).collect();
        let mut stash = Self::default();
        let mut out = String::with_capacity(clean.len());
        let mut rest = clean.as_str();

        while let Some(pos) = rest.find('\\') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            let style = if tail.starts_with(r"\(") {
                Some(MathStyle::Inline)
            } else if tail.starts_with(r"\[") {
                Some(MathStyle::Display)
            } else {
                None
            };

            if let Some(style) = style
                && let Some((body, after)) = split_expression(&tail[2..], style)
            {
                stash.push(&mut out, style, body);
                rest = after;
                continue;
            }

            // Keep the backslash and the character it escapes together so
            // `\\(` is never read as an opener.
            let step = tail.chars().nth(1).map_or(1, |c| 1 + c.len_utf8());
            out.push_str(&tail[..step]);
            rest = &tail[step..];
        }

        out.push_str(rest);
        (out, stash)
    }

    fn push(&mut self, out: &mut String, style: MathStyle, body: &str) {
        let (start, end) = style.sentinels();
        out.push(start);
        out.push_str(&self.expressions.len().to_string());
        out.push(end);
        self.expressions.push(body.to_owned());
    }

    /// Number of stashed expressions.
    pub(crate) fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Put the original delimited source back (used for code, link
    /// attributes and image alt text).
    pub(crate) fn restore(&self, text: &str) -> String {
        self.expand(text, |out, style, body| {
            let (open, close) = style.delimiters();
            out.push_str(open);
            out.push_str(body);
            out.push_str(close);
        })
    }

    /// Turn placeholders in converted HTML into math spans holding the
    /// escaped LaTeX source.
    pub(crate) fn substitute(&self, html: &str) -> String {
        if self.expressions.is_empty() {
            return html.to_owned();
        }
        self.expand(html, |out, style, body| {
            out.push_str(style.open_tag());
            out.push_str(&escape_html(body));
            out.push_str("</span>");
        })
    }

    fn expand(&self, text: &str, write: impl Fn(&mut String, MathStyle, &str)) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();

        while let Some(ch) = chars.next() {
            let style = match ch {
                INLINE_START => MathStyle::Inline,
                DISPLAY_START => MathStyle::Display,
                INLINE_END | DISPLAY_END => continue,
                _ => {
                    out.push(ch);
                    continue;
                }
            };

            let (_, end) = style.sentinels();
            let mut index = 0usize;
            let mut closed = false;
            for c in chars.by_ref() {
                match c.to_digit(10) {
                    Some(digit) => index = index.saturating_mul(10).saturating_add(digit as usize),
                    None => {
                        closed = c == end;
                        break;
                    }
                }
            }

            if closed && let Some(body) = self.expressions.get(index) {
                write(&mut out, style, body);
            }
        }

        out
    }
}

/// Split `text` (just after an opener) at the matching closer.
fn split_expression(text: &str, style: MathStyle) -> Option<(&str, &str)> {
    let (_, close) = style.delimiters();
    let end = text.find(close)?;
    let body = &text[..end];
    if body.contains('`') {
        return None;
    }
    Some((body, &text[end + close.len()..]))
}

/// Typeset a LaTeX expression as MathML.
pub(crate) fn typeset(expression: &str, style: MathStyle) -> Result<String, String> {
    let display = match style {
        MathStyle::Inline => DisplayStyle::Inline,
        MathStyle::Display => DisplayStyle::Block,
    };
    latex_to_mathml(expression, display).map_err(|e| e.to_string())
}
