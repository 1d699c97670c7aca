//! Markdown to HTML conversion.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::math::{self, MathStash};

/// Convert placeholder-protected markdown into HTML.
///
/// Code spans and code blocks are escaped by the converter and get their
/// math source back, so `\(` inside code stays literal.  The same holds for
/// link destinations and titles and for image alt text, which end up in
/// attribute values.  Raw HTML in the reply is demoted to text.
pub(crate) fn markdown_to_html(markdown: &str, stash: &MathStash) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut in_code_block = false;
    let mut image_depth = 0usize;
    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            in_code_block = true;
            let kind = match kind {
                CodeBlockKind::Fenced(info) => CodeBlockKind::Fenced(restore(stash, info)),
                indented => indented,
            };
            Event::Start(Tag::CodeBlock(kind))
        }
        Event::End(TagEnd::CodeBlock) => {
            in_code_block = false;
            Event::End(TagEnd::CodeBlock)
        }
        Event::Text(text) if in_code_block || image_depth > 0 => {
            Event::Text(restore(stash, text))
        }
        Event::Code(text) => Event::Code(restore(stash, text)),
        Event::Html(raw) | Event::InlineHtml(raw) if image_depth > 0 => {
            Event::Text(restore(stash, raw))
        }
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: restore(stash, dest_url),
            title: restore(stash, title),
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            image_depth += 1;
            Event::Start(Tag::Image {
                link_type,
                dest_url: restore(stash, dest_url),
                title: restore(stash, title),
                id,
            })
        }
        Event::End(TagEnd::Image) => {
            image_depth = image_depth.saturating_sub(1);
            Event::End(TagEnd::Image)
        }
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn restore<'a>(stash: &MathStash, text: CowStr<'a>) -> CowStr<'a> {
    if math::has_sentinels(&text) {
        CowStr::from(stash.restore(&text))
    } else {
        text
    }
}
