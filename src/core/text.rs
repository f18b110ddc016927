//! Text helpers for post authoring

use regex::Regex;
use std::sync::OnceLock;

/// Maximum slug length in characters
pub const MAX_SLUG_LEN: usize = 100;

/// Default reading speed used for reading-time estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Generate a URL-friendly slug
///
/// Lowercases, collapses every run of characters outside ASCII word
/// characters and common CJK ideographs into `-`, trims leading/trailing
/// dashes and caps the result at [`MAX_SLUG_LEN`] characters.
pub fn generate_slug(text: &str) -> String {
    static NON_SLUG: OnceLock<Regex> = OnceLock::new();
    let regex =
        NON_SLUG.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\x{4e00}-\x{9fa5}]+").unwrap());

    let lowered = text.trim().to_lowercase();
    let dashed = regex.replace_all(&lowered, "-");
    dashed
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// Truncate to `length` characters, appending `...` when cut
pub fn truncate_text(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let mut out: String = text.chars().take(length).collect();
    out.push_str("...");
    out
}

/// Estimated reading time in minutes
///
/// Blank content reads in 0 minutes; anything else in at least 1.
pub fn reading_time(content: &str, words_per_minute: usize) -> u32 {
    let words = content.split_whitespace().count();
    if words == 0 {
        return 0;
    }
    words.div_ceil(words_per_minute.max(1)) as u32
}

/// Strip Markdown syntax, keeping readable text
pub fn extract_plain_text(markdown: &str) -> String {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    let rules = RULES.get_or_init(|| {
        [
            (r"(?s)```.*?```", ""),
            (r"`[^`]*`", ""),
            (r"!\[([^\]]*)\]\([^)]+\)", "$1"),
            (r"\[([^\]]+)\]\([^)]+\)", "$1"),
            (r"(?m)^#+\s+", ""),
            (r"\*\*([^*]+)\*\*", "$1"),
            (r"\*([^*]+)\*", "$1"),
            (r"(?m)^>\s+", ""),
            (r"(?m)^[ \t]*[-*+]\s+", ""),
            (r"(?m)^[ \t]*\d+\.\s+", ""),
            (r"\n\s*\n", "\n"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect()
    });

    let mut text = markdown.to_string();
    for (regex, replacement) in rules {
        text = regex.replace_all(&text, *replacement).into_owned();
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_ascii() {
        assert_eq!(generate_slug("  Hello, World! Rust 2024 "), "hello-world-rust-2024");
    }

    #[test]
    fn test_slug_keeps_cjk() {
        assert_eq!(generate_slug("欢迎使用 BlogFlow"), "欢迎使用-blogflow");
    }

    #[test]
    fn test_slug_is_capped() {
        let long = "a".repeat(250);
        assert_eq!(generate_slug(&long).chars().count(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_slug_only_symbols() {
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("这是一个标题", 2), "这是...");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time("", WORDS_PER_MINUTE), 0);
        assert_eq!(reading_time("one two three", WORDS_PER_MINUTE), 1);
        let words = "word ".repeat(401);
        assert_eq!(reading_time(&words, WORDS_PER_MINUTE), 3);
    }

    #[test]
    fn test_extract_plain_text() {
        let md = "# Title\n\nSome **bold** and *em* with [a link](https://x.y).\n\n```rust\nfn main() {}\n```\n\n> quoted\n- item\n1. first\n![img](pic.png)";
        let text = extract_plain_text(md);
        assert!(text.starts_with("Title"));
        assert!(text.contains("Some bold and em with a link."));
        assert!(!text.contains("fn main"));
        assert!(text.contains("quoted"));
        assert!(text.contains("item"));
        assert!(text.contains("first"));
        assert!(text.contains("img"));
        assert!(!text.contains("!["));
    }
}
