//! Rich-text rendering for post bodies
//!
//! Markdown is rendered with GFM extensions and hard line breaks. Rendering
//! never fails: if the renderer panics, the output degrades to escaped text
//! with `<br>` line breaks.

use pulldown_cmark::{Event, Options, Parser, html};
use std::panic::{self, AssertUnwindSafe};

/// Render Markdown source to HTML
///
/// Empty input yields an empty string.
pub fn render_rich_text(source: &str) -> String {
    if source.is_empty() {
        return String::new();
    }

    match panic::catch_unwind(AssertUnwindSafe(|| render_markdown(source))) {
        Ok(rendered) => rendered,
        Err(_) => {
            tracing::warn!(len = source.len(), "markdown rendering failed, using fallback");
            render_fallback(source)
        }
    }
}

fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // Soft breaks become hard breaks, matching `breaks: true` renderers
    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Minimal deterministic transform: escape, then newline → `<br>`
pub fn render_fallback(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(render_rich_text(""), "");
    }

    #[test]
    fn test_heading_and_emphasis() {
        let html = render_rich_text("# Title\n\n**bold** and *em*");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>em</em>"));
    }

    #[test]
    fn test_soft_breaks_become_br() {
        let html = render_rich_text("line one\nline two");
        assert!(html.contains("<br />"));
    }

    #[test]
    fn test_code_block_is_escaped() {
        let html = render_rich_text("```html\n<div>x</div>\n```");
        assert!(html.contains("&lt;div&gt;"));
        assert!(html.contains("language-html"));
    }

    #[test]
    fn test_table_extension() {
        let html = render_rich_text("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let text = "a < b\nc & d";
        assert_eq!(render_fallback(text), "a &lt; b<br>c &amp; d");
        assert_eq!(render_fallback(text), render_fallback(text));
    }
}
