//! Tree serialization with sanitization.
//!
//! The rendered HTML is parsed into a `scraper` tree and written back out by
//! this module.  Writing is where unsafe markup is removed: dangerous
//! elements are dropped with their content, event-handler attributes are
//! skipped, and URLs with non-web schemes are discarded.  Comments, doctypes
//! and processing instructions are never written.
//!
//! A [`Rewrite`] hook gets first refusal on every element, which is how the
//! renderer replaces math spans and code blocks in the same pass.

use scraper::{ElementRef, Html, Node};
use tracing::debug;
use url::Url;

use crate::escape::{push_attr, push_text};

const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "form", "link", "meta",
    "base", "noscript", "template",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "poster", "background"];

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Per-element hook used while writing a tree.
pub(crate) trait Rewrite {
    /// Write `element` in full and return `true`, or return `false` to let
    /// the default serialization handle it.
    fn rewrite(&mut self, element: ElementRef<'_>, out: &mut String) -> bool;
}

/// A hook that never rewrites.
pub(crate) struct Passthrough;

impl Rewrite for Passthrough {
    fn rewrite(&mut self, _element: ElementRef<'_>, _out: &mut String) -> bool {
        false
    }
}

/// Parse an HTML fragment and write it back without unsafe markup.
pub fn sanitize_html(html: &str) -> String {
    write_fragment(&Html::parse_fragment(html), &mut Passthrough)
}

/// Write the contents of a parsed fragment.
pub(crate) fn write_fragment(fragment: &Html, hook: &mut impl Rewrite) -> String {
    let mut out = String::new();
    write_children(fragment.root_element(), &mut out, hook);
    out
}

/// Write the children of `element` (not the element itself).
pub(crate) fn write_children(element: ElementRef<'_>, out: &mut String, hook: &mut impl Rewrite) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_element(child_element, out, hook);
        } else if let Node::Text(text) = child.value() {
            push_text(out, text);
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String, hook: &mut impl Rewrite) {
    let name = element.value().name();
    if DROPPED_ELEMENTS.contains(&name) {
        debug!(element = name, "dropped unsafe element");
        return;
    }

    if hook.rewrite(element, out) {
        return;
    }

    write_start_tag(element, out);
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    write_children(element, out, hook);
    write_end_tag(name, out);
}

/// Write `<name attr="...">` keeping only safe attributes.
pub(crate) fn write_start_tag(element: ElementRef<'_>, out: &mut String) {
    let value = element.value();
    out.push('<');
    out.push_str(value.name());
    for (attr, attr_value) in value.attrs() {
        if !attribute_allowed(attr, attr_value) {
            debug!(element = value.name(), attribute = attr, "dropped unsafe attribute");
            continue;
        }
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        push_attr(out, attr_value);
        out.push('"');
    }
    out.push('>');
}

pub(crate) fn write_end_tag(name: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn attribute_allowed(name: &str, value: &str) -> bool {
    if !plain_attribute_name(name) {
        return false;
    }
    if name.to_ascii_lowercase().starts_with("on") {
        return false;
    }
    if URL_ATTRIBUTES.contains(&name) {
        return url_allowed(value);
    }
    true
}

/// Names are written unquoted, so only `[A-Za-z0-9:_-]` gets through.
fn plain_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'-'))
}

/// Whether a link target is safe to keep.
///
/// Relative references are allowed; absolute URLs must use a web or mail
/// scheme.
pub(crate) fn url_allowed(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => ALLOWED_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
