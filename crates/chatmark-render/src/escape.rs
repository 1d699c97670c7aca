//! HTML escaping helpers.

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape user-entered text for display.
///
/// Line breaks become `<br>` so that multi-line input keeps its shape once
/// shown as markup.  The text is never interpreted as markdown.
pub fn escape_user_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(normalized.len());
    for (i, line) in normalized.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        out.push_str(&escape_html(line));
    }
    out
}

/// Escape a text node the way an HTML serializer does.
pub(crate) fn push_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value (always written double-quoted).
pub(crate) fn push_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_html_leaves_plain_text_alone() {
        assert_eq!(escape_html("2+2?"), "2+2?");
    }

    #[test]
    fn user_text_keeps_line_breaks() {
        assert_eq!(escape_user_text("a<b\r\nc"), "a&lt;b<br>c");
    }

    #[test]
    fn user_text_is_not_markdown() {
        assert_eq!(escape_user_text("**bold**"), "**bold**");
    }

    #[test]
    fn text_nodes_do_not_escape_quotes() {
        let mut out = String::new();
        push_text(&mut out, "say \"hi\" & <go>");
        assert_eq!(out, "say \"hi\" &amp; &lt;go&gt;");
    }
}
